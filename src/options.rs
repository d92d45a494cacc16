use typed_builder::TypedBuilder;

use crate::error::PagerError;
use crate::PagerResult;

/// Caller-supplied limits for a single pagination call.
///
/// The default value places no limits: the server's default page size is used,
/// pagination starts at the first page and next links are followed until the
/// server stops sending them.
///
/// ```
/// use linkpager_rs::PaginationOptions;
///
/// let options = PaginationOptions::builder()
///     .page_size(50)
///     .page_count(2)
///     .build();
/// assert_eq!(options.page_size(), Some(50));
/// assert_eq!(options.start_page(), None);
/// ```
#[derive(TypedBuilder, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    /// First page to request.
    #[builder(default, setter(strip_option))]
    start_page: Option<u32>,
    /// Items requested per page.
    #[builder(default, setter(strip_option))]
    page_size: Option<u32>,
    /// Maximum number of pages fetched by one call.
    #[builder(default, setter(strip_option))]
    page_count: Option<u32>,
}

impl PaginationOptions {
    /// Options without any limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first page to request, if set.
    pub fn start_page(&self) -> Option<u32> {
        self.start_page
    }

    /// Returns the requested page size, if set.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Returns the maximum number of pages to fetch, if set.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Checks that every set field is strictly positive.
    pub fn validate(&self) -> PagerResult<()> {
        if self.start_page == Some(0) {
            return Err(PagerError::ZeroStartPage);
        }
        if self.page_size == Some(0) {
            return Err(PagerError::ZeroPageSize);
        }
        if self.page_count == Some(0) {
            return Err(PagerError::ZeroPageCount);
        }
        Ok(())
    }
}
