//! Parsing of the `Link` response header (RFC 8288).
//!
//! Only the pieces a paginating client needs are extracted: the target URL of
//! each link and its `rel` values.

use reqwest::header::HeaderMap;

/// Pagination links parsed from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    /// URL of the next page.
    pub next: Option<String>,
    /// URL of the previous page.
    pub prev: Option<String>,
    /// URL of the first page.
    pub first: Option<String>,
    /// URL of the last page.
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Parses the value of a `Link` header.
    ///
    /// Malformed entries are skipped. A link may carry several space separated
    /// relation types (`rel="next last"`).
    pub fn parse(header_value: &str) -> Self {
        let mut links = Self::default();
        let mut rest = header_value;

        while let Some(start) = rest.find('<') {
            let Some(end) = rest[start..].find('>').map(|end| start + end) else {
                break;
            };
            let target = rest[start + 1..end].trim();
            let tail = &rest[end + 1..];
            // Parameters run until the next link target.
            let params_end = tail.find('<').unwrap_or(tail.len());
            let params = &tail[..params_end];
            rest = &tail[params_end..];

            for rel in relation_types(params) {
                let slot = match rel.to_ascii_lowercase().as_str() {
                    "next" => &mut links.next,
                    "prev" | "previous" => &mut links.prev,
                    "first" => &mut links.first,
                    "last" => &mut links.last,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(target.to_string());
                }
            }
        }

        links
    }

    /// Parses the `Link` header of a response, if there is one.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(Self::parse)
            .fold(Self::default(), |acc, links| Self {
                next: acc.next.or(links.next),
                prev: acc.prev.or(links.prev),
                first: acc.first.or(links.first),
                last: acc.last.or(links.last),
            })
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

fn relation_types(params: &str) -> Vec<&str> {
    params
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("rel") {
                Some(value.trim().trim_end_matches(',').trim().trim_matches('"'))
            } else {
                None
            }
        })
        .flat_map(str::split_whitespace)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, LINK};

    #[test]
    fn parses_github_style_header() {
        let links = PaginationLinks::parse(
            r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#,
        );
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.github.com/repositories/1/issues?page=2")
        );
        assert_eq!(
            links.last.as_deref(),
            Some("https://api.github.com/repositories/1/issues?page=5")
        );
        assert!(links.prev.is_none());
    }

    #[test]
    fn keeps_commas_inside_targets() {
        let links = PaginationLinks::parse(
            r#"<https://example.com/items?ids=1,2,3&page=2>; rel="next""#,
        );
        assert_eq!(
            links.next.as_deref(),
            Some("https://example.com/items?ids=1,2,3&page=2")
        );
    }

    #[test]
    fn handles_multiple_relation_types_and_unquoted_values() {
        let links =
            PaginationLinks::parse("<https://example.com/p/3>; rel=\"next last\", <https://example.com/p/1>; rel=prev");
        assert_eq!(links.next.as_deref(), Some("https://example.com/p/3"));
        assert_eq!(links.last.as_deref(), Some("https://example.com/p/3"));
        assert_eq!(links.prev.as_deref(), Some("https://example.com/p/1"));
    }

    #[test]
    fn no_next_on_last_page() {
        let links = PaginationLinks::parse(r#"<https://example.com/p/1>; rel="first", <https://example.com/p/2>; rel="prev""#);
        assert!(!links.has_next());
        assert_eq!(links.first.as_deref(), Some("https://example.com/p/1"));
    }

    #[test]
    fn skips_garbage() {
        assert_eq!(PaginationLinks::parse("garbage"), PaginationLinks::default());
        assert_eq!(PaginationLinks::parse("<unterminated; rel=next"), PaginationLinks::default());
    }

    #[test]
    fn reads_from_header_map() {
        let mut headers = HeaderMap::new();
        assert!(!PaginationLinks::from_headers(&headers).has_next());

        headers.insert(
            LINK,
            HeaderValue::from_static(r#"<https://example.com/p/2>; rel="next""#),
        );
        assert_eq!(
            PaginationLinks::from_headers(&headers).next.as_deref(),
            Some("https://example.com/p/2")
        );
    }
}
