use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

use crate::page::Page;
use crate::PagerResult;

/// Fetches a single page of a listing.
///
/// This is the only thing the [`Paginator`](crate::Paginator) needs from a transport.
/// [`PagerClient`](crate::PagerClient) implements it over HTTP for every item type
/// that can be deserialized; tests and alternative transports can implement it directly.
///
/// Implementations perform exactly one request per call and must not retry on their own.
/// Any failure is returned as-is and ends the stream.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetches the page at `url`, sending `headers` along.
    async fn fetch_page(&self, url: &Url, headers: &HeaderMap) -> PagerResult<Page<T>>;
}
