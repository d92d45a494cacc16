use url::Url;

use crate::error::PagerError;
use crate::options::PaginationOptions;
use crate::params::Parameters;
use crate::PagerResult;

/// Query parameter carrying the page number on the first request.
pub const PAGE_PARAM: &str = "page";
/// Query parameter carrying the page size on the first request.
pub const PER_PAGE_PARAM: &str = "per_page";

/// Pagination cursor of one active stream.
///
/// In order to create a cursor, call `FetchCursor::start()` with the resource URL.
/// This resolves the first request, merging `page`/`per_page` into its query.
///
/// Every fetched page advances the cursor to the next link the server returned.
/// If the server returned none, or the page count cap is reached, the cursor is closed.
#[derive(Debug, Clone)]
pub struct FetchCursor {
    /// Where to fetch next. `None` once the stream is exhausted.
    next_target: Option<Url>,
    /// The number of pages retrieved so far.
    pages_fetched: u32,
    /// The maximum amount of pages that will be fetched.
    page_count: Option<u32>,
}

impl FetchCursor {
    /// Creates a cursor pointing at the first page of `url`.
    ///
    /// Fails if the options are invalid, if `url` is empty or cannot be parsed, or if a
    /// caller supplied parameter has the same name as one injected from the options.
    pub fn start(url: &str, params: &Parameters, options: &PaginationOptions) -> PagerResult<Self> {
        options.validate()?;

        let url = url.trim();
        if url.is_empty() {
            return Err(PagerError::EmptyUrl);
        }
        let mut target = Url::parse(url)?;

        let mut injected = Vec::new();
        if let Some(page) = options.start_page() {
            injected.push((PAGE_PARAM, page));
        }
        if let Some(page_size) = options.page_size() {
            injected.push((PER_PAGE_PARAM, page_size));
        }

        let already_in_url = |name: &str| target.query_pairs().any(|(key, _)| key == name);
        for (name, _) in &injected {
            if params.contains(name) || already_in_url(name) {
                return Err(PagerError::ParameterCollision {
                    name: name.to_string(),
                });
            }
        }

        if !params.is_empty() || !injected.is_empty() {
            let mut query = target.query_pairs_mut();
            for (key, value) in params.iter() {
                query.append_pair(key, value);
            }
            for (key, value) in &injected {
                query.append_pair(key, &value.to_string());
            }
        }

        Ok(Self {
            next_target: Some(target),
            pages_fetched: 0,
            page_count: options.page_count(),
        })
    }

    /// Returns where the next page will be fetched from.
    pub fn next_target(&self) -> Option<&Url> {
        self.next_target.as_ref()
    }

    /// Returns the number of pages retrieved so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Returns whether no further page will be fetched.
    pub fn closed(&self) -> bool {
        self.next_target.is_none()
    }

    /// Returns whether the page count cap has been reached.
    pub fn limit_reached(&self) -> bool {
        self.page_count
            .is_some_and(|page_count| self.pages_fetched >= page_count)
    }

    /// Records a fetched page and moves the cursor to its next link.
    ///
    /// Once the page count cap is reached the cursor closes and the link is ignored.
    /// Otherwise the link is used verbatim; relative links are resolved against the URL the
    /// page was fetched from. A link that cannot be parsed is returned as an error.
    pub fn advance(&mut self, next_link: Option<&str>) -> PagerResult<()> {
        self.pages_fetched += 1;
        let current = self.next_target.take();
        if self.limit_reached() {
            return Ok(());
        }
        self.next_target = match (next_link, current) {
            (Some(link), Some(current)) => Some(current.join(link)?),
            (Some(link), None) => Some(Url::parse(link)?),
            (None, _) => None,
        };
        Ok(())
    }
}
