/// Error type for the linkpager-rs crate.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PagerError {
    /// `start_page` was set to zero.
    #[error("The start page must be a positive integer.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::ZeroStartPage))]
    ZeroStartPage,

    /// `page_size` was set to zero.
    #[error("The page size must be a positive integer.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::ZeroPageSize))]
    ZeroPageSize,

    /// `page_count` was set to zero.
    #[error("The page count must be a positive integer.")]
    #[diagnostic(
        code(linkpager_rs::error::PagerError::ZeroPageCount),
        help("Leave the page count unset to follow next links until the last page.")
    )]
    ZeroPageCount,

    /// A query parameter supplied by the caller collides with one injected from the pagination options.
    #[error("The query parameter `{name}` is also set by the pagination options.")]
    #[diagnostic(
        code(linkpager_rs::error::PagerError::ParameterCollision),
        help("Remove the parameter from the query or unset the matching pagination option.")
    )]
    ParameterCollision {
        /// Name of the colliding parameter.
        name: String,
    },

    /// The resource URL was empty.
    #[error("The resource URL is empty.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::EmptyUrl))]
    EmptyUrl,

    /// Invalid header name.
    #[error("Invalid header name.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::InvalidHeader))]
    InvalidHeader,

    /// A placeholder of a resource path template has no matching argument.
    #[error("The path template placeholder `{{{name}}}` has no argument.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::MissingPathArgument))]
    MissingPathArgument {
        /// Name of the placeholder.
        name: String,
    },

    /// A path argument does not match any placeholder of the resource path template.
    #[error("The path argument `{name}` does not appear in the path template.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::UnknownPathArgument))]
    UnknownPathArgument {
        /// Name of the argument.
        name: String,
    },

    /// Url parsing error.
    #[error(transparent)]
    #[diagnostic(code(linkpager_rs::error::PagerError::UrlParseError))]
    UrlParseError(#[from] url::ParseError),

    /// The server answered 404.
    #[error("The resource at {url} was not found.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::NotFound))]
    NotFound {
        /// The requested URL.
        url: String,
    },

    /// The server answered 401.
    #[error("The client is not authenticated.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::Unauthorized))]
    Unauthorized,

    /// The server answered 403 without signalling an exhausted rate limit.
    #[error("The client is not allowed to access {url}.")]
    #[diagnostic(code(linkpager_rs::error::PagerError::Forbidden))]
    Forbidden {
        /// The requested URL.
        url: String,
    },

    /// The server rejected the request because the rate limit is exhausted.
    #[error("The rate limit has been exceeded.")]
    #[diagnostic(
        code(linkpager_rs::error::PagerError::RateLimited),
        help("Wait for the rate limit window to reset before paginating again.")
    )]
    RateLimited {
        /// Seconds until the limit resets, if the server said so.
        retry_after: Option<u64>,
    },

    /// Any other non-success status.
    #[error("The server responded with {status}: {body}")]
    #[diagnostic(code(linkpager_rs::error::PagerError::Http))]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The response body, as far as it could be read.
        body: String,
    },

    /// The page body could not be decoded.
    #[error(transparent)]
    #[diagnostic(code(linkpager_rs::error::PagerError::Decode))]
    Decode(#[from] serde_json::Error),

    /// The request to the server has failed.
    #[error(transparent)]
    #[diagnostic(code(linkpager_rs::error::PagerError::ReqwestError))]
    ReqwestError(#[from] reqwest::Error),

    /// An invalid header value has been provided.
    #[error(transparent)]
    #[diagnostic(code(linkpager_rs::error::PagerError::InvalidHeaderValue))]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    /// An error raised by a custom page fetcher.
    #[error(transparent)]
    #[diagnostic(code(linkpager_rs::error::PagerError::Transport))]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl PagerError {
    /// Returns whether the error stems from invalid input, detected before any request was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PagerError::ZeroStartPage
                | PagerError::ZeroPageSize
                | PagerError::ZeroPageCount
                | PagerError::ParameterCollision { .. }
                | PagerError::EmptyUrl
                | PagerError::InvalidHeader
                | PagerError::InvalidHeaderValue(_)
                | PagerError::MissingPathArgument { .. }
                | PagerError::UnknownPathArgument { .. }
                | PagerError::UrlParseError(_)
        )
    }

    /// Returns whether the error was raised while fetching a page.
    pub fn is_fetch_failure(&self) -> bool {
        !self.is_configuration()
    }

    /// Wraps an arbitrary error of a custom page fetcher.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PagerError::Transport(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_configuration_errors() {
        assert!(PagerError::ZeroPageCount.is_configuration());
        assert!(PagerError::ParameterCollision {
            name: "page".to_string()
        }
        .is_configuration());
        assert!(!PagerError::Unauthorized.is_configuration());
    }

    #[test]
    fn classifies_fetch_failures() {
        assert!(PagerError::NotFound {
            url: "https://example.com".to_string()
        }
        .is_fetch_failure());
        assert!(PagerError::RateLimited { retry_after: None }.is_fetch_failure());
        assert!(PagerError::transport(std::io::Error::other("boom")).is_fetch_failure());
        assert!(!PagerError::EmptyUrl.is_fetch_failure());
    }

    #[test]
    fn renders_messages() {
        let err = PagerError::MissingPathArgument {
            name: "owner".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The path template placeholder `{owner}` has no argument."
        );
        let err = PagerError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "The server responded with 502: bad gateway");
    }
}
