//! The pagination engine.
//!
//! A [`Paginator`] walks the pages of a listing one after another and hands the
//! items out as a single [`PageStream`]. Pages are fetched lazily: nothing is
//! requested before the stream is polled, and page `N + 1` is only requested
//! once every item of page `N` has been handed out.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::stream::BoxStream;
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::cursor::FetchCursor;
use crate::error::PagerError;
use crate::fetcher::PageFetcher;
use crate::options::PaginationOptions;
use crate::params::Parameters;
use crate::PagerResult;

/// Drives a [`PageFetcher`] over all pages of a listing.
///
/// The fetcher is shared by every stream the paginator creates; the streams
/// themselves share no state and can be consumed independently.
pub struct Paginator<F: ?Sized> {
    fetcher: Arc<F>,
}

impl<F: ?Sized> Clone for Paginator<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F: ?Sized> Paginator<F> {
    /// Creates a paginator on top of the given page fetcher.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }

    /// Returns the underlying page fetcher.
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    /// Streams every item of the listing at `url`, page by page, in server order.
    ///
    /// `params` are added to the query of the first request, together with `page` and
    /// `per_page` if `options` set a start page or page size. Follow-up requests use the
    /// next link of the previous page verbatim. `headers` are sent with every request.
    ///
    /// Invalid options, URLs or headers are reported here, before anything is fetched.
    /// The first request is sent once the returned stream is polled.
    ///
    /// ## Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use futures::StreamExt;
    /// use linkpager_rs::{collection, PagerClient, PaginationOptions, Paginator, Value};
    ///
    /// #[tokio::main]
    /// async fn main() -> linkpager_rs::PagerResult<()> {
    ///     let client = PagerClient::builder()
    ///         .base_url("https://api.github.com")
    ///         .build()?;
    ///     let paginator = Paginator::new(Arc::new(client));
    ///     let mut issues = paginator.paginate::<Value>(
    ///         "https://api.github.com/repos/rust-lang/rust/issues",
    ///         collection! { "state" => "open" },
    ///         None,
    ///         PaginationOptions::builder().page_size(100).page_count(3).build(),
    ///     )?;
    ///     while let Some(issue) = issues.next().await {
    ///         println!("{}", issue?["title"]);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn paginate<T>(
        &self,
        url: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageStream<T>>
    where
        F: PageFetcher<T> + 'static,
        T: Send + 'static,
    {
        let batches = self.pages::<T>(url, params, headers, options)?;
        let cancel = batches.cancel_handle();
        let items = flatten_batches(batches.inner, cancel.token.clone());
        Ok(PageStream {
            inner: items.boxed(),
            cancel,
            _guard: batches._guard,
        })
    }

    /// Like [`paginate`](Self::paginate), but yields the items of each page as one batch.
    pub fn pages<T>(
        &self,
        url: &str,
        params: Parameters,
        headers: Option<HashMap<&str, &str>>,
        options: PaginationOptions,
    ) -> PagerResult<PageBatches<T>>
    where
        F: PageFetcher<T> + 'static,
        T: Send + 'static,
    {
        let cursor = FetchCursor::start(url, &params, &options)?;
        let headers = build_headers(headers)?;
        let token = CancellationToken::new();
        let batches = walk_pages(Arc::clone(&self.fetcher), cursor, headers, token.clone());
        Ok(PageStream {
            inner: batches.boxed(),
            cancel: CancelHandle {
                token: token.clone(),
            },
            _guard: token.drop_guard(),
        })
    }
}

fn build_headers(headers: Option<HashMap<&str, &str>>) -> PagerResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.unwrap_or_default() {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| PagerError::InvalidHeader)?;
        let value = HeaderValue::from_str(value)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn walk_pages<T, F>(
    fetcher: Arc<F>,
    mut cursor: FetchCursor,
    headers: HeaderMap,
    cancel: CancellationToken,
) -> impl Stream<Item = PagerResult<Vec<T>>> + Send + 'static
where
    F: PageFetcher<T> + ?Sized + 'static,
    T: Send + 'static,
{
    async_stream::stream! {
        loop {
            if cancel.is_cancelled() {
                tracing::debug!(pages = cursor.pages_fetched(), "pagination cancelled");
                break;
            }
            let target = match cursor.next_target() {
                Some(target) => target.clone(),
                None => break,
            };
            let page_number = cursor.pages_fetched() + 1;
            tracing::debug!(url = %target, page = page_number, "fetching page");

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(url = %target, page = page_number, "pagination cancelled during fetch");
                    break;
                }
                fetched = fetcher.fetch_page(&target, &headers) => fetched,
            };
            let page = match fetched {
                Ok(page) => page,
                Err(err) => {
                    tracing::warn!(url = %target, page = page_number, error = %err, "failed to fetch page");
                    yield Err(err);
                    break;
                }
            };
            tracing::debug!(page = page_number, items = page.len(), has_next = page.has_next(), "fetched page");

            let next_link = page.next_link;
            yield Ok(page.items);

            if cancel.is_cancelled() {
                tracing::debug!(pages = cursor.pages_fetched() + 1, "pagination cancelled");
                break;
            }
            if next_link.is_none() {
                tracing::debug!(pages = page_number, "fetched last page");
                break;
            }
            if let Err(err) = cursor.advance(next_link.as_deref()) {
                tracing::warn!(page = page_number, error = %err, "server sent an invalid next link");
                yield Err(err);
                break;
            }
            if cursor.limit_reached() {
                tracing::debug!(pages = cursor.pages_fetched(), "page count reached");
                break;
            }
        }
    }
}

fn flatten_batches<T>(
    mut batches: BoxStream<'static, PagerResult<Vec<T>>>,
    cancel: CancellationToken,
) -> impl Stream<Item = PagerResult<T>> + Send + 'static
where
    T: Send + 'static,
{
    async_stream::stream! {
        'pages: while let Some(batch) = batches.next().await {
            match batch {
                Ok(items) => {
                    for item in items {
                        if cancel.is_cancelled() {
                            break 'pages;
                        }
                        yield Ok(item);
                    }
                }
                Err(err) => {
                    yield Err(err);
                    break 'pages;
                }
            }
        }
    }
}

/// Handle to cancel a [`PageStream`] from anywhere, e.g. another task.
///
/// After cancellation the stream yields no further items and ends without an error.
/// A fetch that is in flight is abandoned; no new fetch is started.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Cancels the stream.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns whether the stream has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// The ordered stream of items produced by [`Paginator::paginate`].
///
/// Yields the items of every fetched page in order. A failed fetch is yielded once as an
/// error, after which the stream ends. Dropping the stream cancels it.
#[must_use = "streams do nothing unless polled"]
pub struct PageStream<T> {
    inner: BoxStream<'static, PagerResult<T>>,
    cancel: CancelHandle,
    _guard: DropGuard,
}

/// The stream of per-page batches produced by [`Paginator::pages`].
pub type PageBatches<T> = PageStream<Vec<T>>;

impl<T> PageStream<T> {
    /// Returns a handle that cancels this stream.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Cancels this stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns whether this stream has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Collects all remaining items into a single Vec, stopping at the first error.
    pub async fn collect_all(self) -> PagerResult<Vec<T>> {
        self.try_collect().await
    }
}

impl<T> Stream for PageStream<T> {
    type Item = PagerResult<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl<T> std::fmt::Debug for PageStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
