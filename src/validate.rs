//! Validators for [`Request::get_with`](crate::Request::get_with).
//!
//! A validator turns the raw stored string into the value a handler wants, or
//! rejects it with `None`. Rejection and absence look the same to the caller.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Strips HTML-like `<...>` tags. The default for [`Request::get`](crate::Request::get).
pub fn safe(value: &str) -> Option<String> {
    Some(TAG.replace_all(value, "").into_owned())
}

/// Passes the value through untouched. Only use it for values that never reach markup.
pub fn raw(value: &str) -> Option<String> {
    Some(value.to_owned())
}

pub fn integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Sanitizes like [`safe`], then rejects what is left if it is blank.
pub fn non_empty(value: &str) -> Option<String> {
    safe(value).filter(|v| !v.trim().is_empty())
}
