//! The per-request context threaded through the middleware chain.
//!
//! A [`Request`] starts out holding what the transport parsed off the wire.
//! Decoding stages then file their results under well-known keys, and the
//! dispatcher adds the bound route parameters under [`ROUTE_PARAMS`] just
//! before the handler runs.

use std::collections::HashMap;

use http::Extensions;

use crate::validate;

/// Name → value map stored under one context key.
pub type Params = HashMap<String, String>;

/// Query-string parameters, filled by [`decode::query`](crate::middleware::decode::query).
pub const URL_PARAMS: &str = "url_params";
/// Path parameters bound by the matched route.
pub const ROUTE_PARAMS: &str = "route_params";
/// Form fields from an urlencoded body, filled by [`decode::form`](crate::middleware::decode::form).
pub const DATA: &str = "data";
/// Cookies from the `cookie` header, filled by [`decode::cookies`](crate::middleware::decode::cookies).
pub const COOKIES: &str = "cookies";

/// An incoming HTTP request and everything stages have learned about it.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) values: HashMap<String, Params>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// Creates a context for `method` and a request target such as `/search?q=rust`.
    ///
    /// The method token is kept as sent; a token with no routing table simply
    /// never matches.
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method: method.into(),
            path: path.to_owned(),
            query: query.to_owned(),
            headers: Vec::new(),
            body: Vec::new(),
            values: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> &str { &self.query }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    // ── Keyed parameter stores ────────────────────────────────────────────────

    pub fn params(&self, key: &str) -> Option<&Params> {
        self.values.get(key)
    }

    /// The store under `key`, created empty if no stage has written it yet.
    pub fn params_mut(&mut self, key: &str) -> &mut Params {
        self.values.entry(key.to_owned()).or_default()
    }

    pub fn set_params(&mut self, key: &str, params: Params) {
        self.values.insert(key.to_owned(), params);
    }

    /// Looks up `name` in the store under `key` and runs it through `validator`.
    ///
    /// `None` means the store is absent, the name is absent, or the validator
    /// rejected the value.
    ///
    /// ```rust
    /// use sprig::{Request, request::URL_PARAMS, validate};
    ///
    /// let mut req = Request::new("GET", "/");
    /// req.params_mut(URL_PARAMS).insert("page".into(), "3".into());
    /// assert_eq!(req.get_with(URL_PARAMS, "page", validate::integer), Some(3));
    /// ```
    pub fn get_with<T>(
        &self,
        key: &str,
        name: &str,
        validator: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        self.get_raw(key, name).and_then(validator)
    }

    /// Sanitized lookup: HTML-like tags are stripped (see [`validate::safe`]).
    pub fn get(&self, key: &str, name: &str) -> Option<String> {
        self.get_with(key, name, validate::safe)
    }

    /// Unsanitized lookup.
    pub fn get_raw(&self, key: &str, name: &str) -> Option<&str> {
        self.values.get(key)?.get(name).map(String::as_str)
    }

    /// Returns a named path parameter, sanitized.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<String> {
        self.get(ROUTE_PARAMS, name)
    }

    pub fn url_param(&self, name: &str) -> Option<String> {
        self.get(URL_PARAMS, name)
    }

    pub fn form(&self, name: &str) -> Option<String> {
        self.get(DATA, name)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.get(COOKIES, name)
    }

    // ── Typed extensions ──────────────────────────────────────────────────────

    /// Arbitrary typed values stages hand to later stages (a session, a user id).
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_splits_into_path_and_query() {
        let req = Request::new("GET", "/search?q=rust&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query(), "q=rust&page=2");
        assert_eq!(Request::new("GET", "/plain").query(), "");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new("GET", "/").with_header("Content-Type", "text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn accessors_sanitize_unless_raw() {
        let mut req = Request::new("GET", "/");
        req.params_mut(DATA).insert("name".into(), "<b>ann</b>".into());
        assert_eq!(req.form("name").as_deref(), Some("ann"));
        assert_eq!(req.get_raw(DATA, "name"), Some("<b>ann</b>"));
        assert_eq!(req.get_with(DATA, "name", validate::raw).as_deref(), Some("<b>ann</b>"));
    }

    #[test]
    fn missing_store_or_name_is_none() {
        let mut req = Request::new("GET", "/");
        assert_eq!(req.param("id"), None);
        req.set_params(ROUTE_PARAMS, Params::from([("id".to_owned(), "7".to_owned())]));
        assert_eq!(req.param("id").as_deref(), Some("7"));
        assert_eq!(req.param("other"), None);
        assert_eq!(req.get_with(ROUTE_PARAMS, "id", |_| None::<()>), None);
    }

    #[test]
    fn extensions_carry_typed_values() {
        #[derive(Clone, Debug, PartialEq)]
        struct UserId(u64);

        let mut req = Request::new("GET", "/");
        req.extensions_mut().insert(UserId(9));
        assert_eq!(req.extensions().get::<UserId>(), Some(&UserId(9)));
    }
}
