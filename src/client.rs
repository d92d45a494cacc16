use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use typed_builder::TypedBuilder;
use url::Url;

use crate::engine::{PageBatches, PageStream, Paginator};
use crate::error::PagerError;
use crate::fetcher::PageFetcher;
use crate::links::PaginationLinks;
use crate::options::PaginationOptions;
use crate::page::Page;
use crate::params::Parameters;
use crate::PagerResult;

const DEFAULT_USER_AGENT: &str = concat!("linkpager-rs/", env!("CARGO_PKG_VERSION"));

/// The internal builder for constructing a `PagerClient`
#[derive(TypedBuilder)]
#[builder(build_method(into = PagerResult<PagerClient>))]
pub struct InternalPagerClient {
    /// URL of the API, relative resource paths are resolved against it
    ///
    /// Example: `https://api.github.com`
    #[builder(setter(transform = |url: &str| url.to_string()))]
    base_url: String,
    /// Token sent as `Authorization: Bearer <token>`
    #[builder(default, setter(transform = |token: &str| Some(token.to_string())))]
    token: Option<String>,
    /// User agent of every request
    #[builder(default = DEFAULT_USER_AGENT.to_string(), setter(transform = |agent: &str| agent.to_string()))]
    user_agent: String,
    /// Default `Accept` header, overridable per call
    #[builder(default = "application/json".to_string(), setter(transform = |accept: &str| accept.to_string()))]
    accept: String,
    /// Allow unsafe SSL certificates
    #[builder(default = false)]
    allow_insecure: bool,
    /// Timeout for a single page request
    #[builder(default = Duration::from_secs(60))]
    timeout: Duration,
}

impl From<InternalPagerClient> for PagerResult<PagerClient> {
    fn from(client: InternalPagerClient) -> Self {
        let mut base_url = Url::parse(client.base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&client.accept)?);
        if let Some(token) = &client.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(client.allow_insecure)
            .timeout(client.timeout)
            .user_agent(client.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(PagerClient { base_url, http })
    }
}

/// HTTP transport for link-paginated list endpoints.
///
/// Every page is fetched with a single `GET`. The response body must be a JSON array of
/// items; the next page is taken from the `rel="next"` entry of the `Link` header.
pub struct PagerClient {
    /// Base URL, always ending in `/`
    base_url: Url,
    /// The client
    http: reqwest::Client,
}

impl PagerClient {
    /// Creates a builder for the client
    pub fn builder() -> InternalPagerClientBuilder {
        InternalPagerClient::builder()
    }

    /// Returns the base URL relative paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a resource path against the base URL.
    ///
    /// Absolute `http(s)` URLs are returned unchanged.
    pub fn resolve(&self, path: &str) -> PagerResult<Url> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PagerError::EmptyUrl);
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Fetches a single page and returns the raw response after checking its status.
    pub async fn get_page_response(&self, url: &Url, headers: &HeaderMap) -> PagerResult<Response> {
        let response = self
            .http
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;
        check_status(url, response).await
    }
}

impl std::fmt::Debug for PagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> PageFetcher<T> for PagerClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, url: &Url, headers: &HeaderMap) -> PagerResult<Page<T>> {
        let response = self.get_page_response(url, headers).await?;
        let next_link = PaginationLinks::from_headers(response.headers()).next;
        let body = response.bytes().await?;
        let items = serde_json::from_slice::<Vec<T>>(&body)?;
        Ok(Page::new(items, next_link))
    }
}

async fn check_status(url: &Url, response: Response) -> PagerResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let headers = response.headers();
    match status {
        StatusCode::UNAUTHORIZED => Err(PagerError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(PagerError::RateLimited {
            retry_after: retry_after(headers),
        }),
        StatusCode::FORBIDDEN if rate_limit_exhausted(headers) => Err(PagerError::RateLimited {
            retry_after: retry_after(headers),
        }),
        StatusCode::FORBIDDEN => Err(PagerError::Forbidden {
            url: url.to_string(),
        }),
        StatusCode::NOT_FOUND => Err(PagerError::NotFound {
            url: url.to_string(),
        }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(PagerError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    header_u64(headers, "x-ratelimit-remaining") == Some(0)
}

/// Seconds until the rate limit resets, from `retry-after` or `x-ratelimit-reset`.
fn retry_after(headers: &HeaderMap) -> Option<u64> {
    if let Some(seconds) = header_u64(headers, RETRY_AFTER.as_str()) {
        return Some(seconds);
    }
    let reset = header_u64(headers, "x-ratelimit-reset")?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(reset.saturating_sub(now))
}

/// Extension trait for a shared `PagerClient` to paginate resource paths.
pub trait PaginatedRequests {
    /// Streams every item of the listing at `path`.
    ///
    /// `path` is resolved against the base URL of the client, see [`PagerClient::resolve`].
    fn paginate<T>(
        &self,
        path: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageStream<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Streams the listing at `path` as one batch per page.
    fn pages<T>(
        &self,
        path: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageBatches<T>>
    where
        T: DeserializeOwned + Send + 'static;
}

impl PaginatedRequests for Arc<PagerClient> {
    fn paginate<T>(
        &self,
        path: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageStream<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.resolve(path)?;
        Paginator::new(Arc::clone(self)).paginate(url.as_str(), params, headers, options)
    }

    fn pages<T>(
        &self,
        path: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageBatches<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.resolve(path)?;
        Paginator::new(Arc::clone(self)).pages(url.as_str(), params, headers, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> PagerClient {
        PagerClient::builder().base_url(base_url).build().unwrap()
    }

    #[test]
    fn resolves_relative_and_absolute_paths() {
        let client = client("https://api.example.com/v3");
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v3/");
        assert_eq!(
            client.resolve("/repos/o/r/issues").unwrap().as_str(),
            "https://api.example.com/v3/repos/o/r/issues"
        );
        assert_eq!(
            client.resolve("https://other.example.com/items").unwrap().as_str(),
            "https://other.example.com/items"
        );
        assert!(matches!(client.resolve(""), Err(PagerError::EmptyUrl)));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = PagerClient::builder().base_url("no scheme").build();
        assert!(matches!(result, Err(PagerError::UrlParseError(_))));
    }

    #[test]
    fn reads_retry_after_before_reset() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert!(rate_limit_exhausted(&headers));
        assert_eq!(retry_after(&headers), Some(30));
    }

    #[test]
    fn reset_in_the_past_means_retry_now() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1"));
        assert_eq!(retry_after(&headers), Some(0));
    }

    #[test]
    fn retry_after_alone_does_not_mark_forbidden_as_rate_limited() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert!(!rate_limit_exhausted(&headers));
    }

    #[test]
    fn forbidden_without_rate_limit_headers_is_not_rate_limited() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));
        assert!(!rate_limit_exhausted(&headers));
        assert_eq!(retry_after(&headers), None);
    }
}
