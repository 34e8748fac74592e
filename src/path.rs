//! Route patterns as segment sequences.
//!
//! Both registered patterns and concrete request paths are split on `/` with
//! empty components dropped, then prefixed with a synthetic root segment.
//! That makes `/`, `""`, `/about` and `/about/` behave the way a reader
//! expects: `/` and `""` are the root route, and a trailing slash is noise.
//!
//! Request path components are percent-decoded one at a time after
//! splitting, so an encoded `%2F` stays inside its component.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Synthetic leading segment for every pattern and path.
///
/// Splitting on `/` never yields this text, so it cannot collide with a real
/// path component.
pub const ROOT: &str = "/";

/// One component of a route pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single component and binds it under this name.
    Param(String),
}

/// Parses a route pattern such as `/users/:id/posts`.
pub fn parse_pattern(pattern: &str) -> Vec<Segment> {
    std::iter::once(Segment::Literal(ROOT.to_owned()))
        .chain(components(pattern).map(|part| match part.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_owned()),
            None => Segment::Literal(part.to_owned()),
        }))
        .collect()
}

/// Splits a request path into raw, still-encoded segments.
pub fn split_path(path: &str) -> Vec<&str> {
    std::iter::once(ROOT).chain(components(path)).collect()
}

/// Splits a request path into the decoded segments the trie consumes.
///
/// Invalid UTF-8 after decoding is replaced with U+FFFD.
pub fn split_decoded(path: &str) -> Vec<Cow<'_, str>> {
    split_path(path)
        .into_iter()
        .map(|part| percent_decode_str(part).decode_utf8_lossy())
        .collect()
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_owned())
    }

    #[test]
    fn root_is_a_single_synthetic_segment() {
        assert_eq!(parse_pattern("/"), vec![lit(ROOT)]);
        assert_eq!(split_path("/"), vec![ROOT]);
        assert_eq!(split_path(""), vec![ROOT]);
    }

    #[test]
    fn params_are_recognised_by_colon() {
        assert_eq!(
            parse_pattern("/users/:id"),
            vec![lit(ROOT), lit("users"), Segment::Param("id".to_owned())],
        );
    }

    #[test]
    fn empty_components_are_dropped() {
        assert_eq!(split_path("/about/"), vec![ROOT, "about"]);
        assert_eq!(split_path("//a///b"), vec![ROOT, "a", "b"]);
    }

    #[test]
    fn request_components_are_percent_decoded() {
        assert_eq!(split_decoded("/a%20b/j%C3%B6rg"), vec![ROOT, "a b", "jörg"]);
        assert!(matches!(split_decoded("/plain")[1], Cow::Borrowed("plain")));
    }

    #[test]
    fn encoded_slash_stays_inside_its_component() {
        assert_eq!(split_decoded("/files/a%2Fb"), vec![ROOT, "files", "a/b"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(split_decoded("/%FF"), vec![ROOT, "\u{FFFD}"]);
    }
}
