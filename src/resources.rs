use std::collections::HashMap;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::client::{PagerClient, PaginatedRequests};
use crate::engine::PageStream;
use crate::error::PagerError;
use crate::options::PaginationOptions;
use crate::params::Parameters;
use crate::PagerResult;

/// A list endpoint described as configuration: a path template and an optional media type.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(ListResource, serde::Deserialize, Debug)]
/// #[list_resource(path = "repos/{owner}/{repo}/issues")]
/// pub struct Issue {
///     pub number: u64,
///     pub title: String,
/// }
///
/// let issues = Issue::list_all(&client, &[("owner", "rust-lang"), ("repo", "rust")],
///     Parameters::new(), PaginationOptions::default())?;
/// ```
pub trait ListResource: DeserializeOwned + Send + 'static {
    /// Path template of the list endpoint, relative to the client's base URL.
    ///
    /// Placeholders are written as `{name}`.
    const PATH: &'static str;
    /// Media type sent as `Accept` header, for endpoints with several response shapes.
    const ACCEPT: Option<&'static str> = None;

    /// Streams every item of this resource.
    fn list_all(
        client: &Arc<PagerClient>,
        path_args: &[(&str, &str)],
        params: Parameters,
        options: PaginationOptions,
    ) -> PagerResult<PageStream<Self>> {
        let path = render_path(Self::PATH, path_args)?;
        let headers = Self::ACCEPT.map(|accept| HashMap::from([("accept", accept)]));
        client.paginate(&path, params, headers, options)
    }
}

/// Fills the `{name}` placeholders of a path template.
///
/// Every placeholder needs an argument and every argument needs a placeholder.
/// Values are percent-encoded as a single path segment.
pub fn render_path(template: &str, args: &[(&str, &str)]) -> PagerResult<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut used = vec![false; args.len()];
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| PagerError::MissingPathArgument {
            name: after.to_string(),
        })?;
        let name = &after[..close];
        let index = args
            .iter()
            .position(|(arg, _)| *arg == name)
            .ok_or_else(|| PagerError::MissingPathArgument {
                name: name.to_string(),
            })?;
        used[index] = true;
        rendered.extend(utf8_percent_encode(args[index].1, PATH_SEGMENT));
        rest = &after[close + 1..];
    }
    rendered.push_str(rest);

    if let Some(index) = used.iter().position(|used| !used) {
        return Err(PagerError::UnknownPathArgument {
            name: args[index].0.to_string(),
        });
    }
    Ok(rendered)
}

/// Everything but the unreserved characters of RFC 3986.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let path = render_path(
            "repos/{owner}/{repo}/issues",
            &[("repo", "rust"), ("owner", "rust-lang")],
        )
        .unwrap();
        assert_eq!(path, "repos/rust-lang/rust/issues");
    }

    #[test]
    fn encodes_argument_values() {
        let path = render_path("users/{user}/repos", &[("user", "a b/c")]).unwrap();
        assert_eq!(path, "users/a%20b%2Fc/repos");

        let path = render_path("users/{user}", &[("user", "jürgen~1.x")]).unwrap();
        assert_eq!(path, "users/j%C3%BCrgen~1.x");
    }

    #[test]
    fn templates_without_placeholders_pass_through() {
        assert_eq!(render_path("user/repos", &[]).unwrap(), "user/repos");
    }

    #[test]
    fn rejects_missing_and_unknown_arguments() {
        let err = render_path("repos/{owner}/{repo}", &[("owner", "o")]).unwrap_err();
        assert!(matches!(err, PagerError::MissingPathArgument { ref name } if name == "repo"));

        let err = render_path("user/repos", &[("owner", "o")]).unwrap_err();
        assert!(matches!(err, PagerError::UnknownPathArgument { ref name } if name == "owner"));
    }
}
