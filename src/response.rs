//! Outgoing HTTP response type and handler return-value normalization.
//!
//! Handlers return the simplest value that says what they mean. [`IntoReply`]
//! maps that value onto one of four [`Reply`] shapes, and [`prepare_response`]
//! applies the shape to the response being built:
//!
//! | Handler returns | Effect |
//! |---|---|
//! | `&str`, `String`, `Vec<u8>` | body set, status untouched |
//! | `u16`, `StatusCode` | status set, body untouched |
//! | `(status, body)` | both set |
//! | `Response` | in-flight response replaced wholesale |
//! | `()` | response left as the handler mutated it |

use http::StatusCode;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// Starts as `200` with no body and no headers; stages and handlers mutate
/// it in place.
///
/// ```rust
/// use sprig::Response;
///
/// let mut res = Response::text("hello");
/// res.set_header("cache-control", "no-store");
/// assert_eq!(res.status(), 200);
///
/// let mut res = Response::default();
/// res.redirect("/login");
/// assert_eq!(res.status(), 302);
/// assert_eq!(res.header("location"), Some("/login"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// Response with no body.
    pub fn new(status: impl Into<u16>) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: status.into() }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        let mut res = Self::default();
        res.set_header("content-type", "text/plain; charset=utf-8");
        res.body = body.into().into_bytes();
        res
    }

    pub fn status(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Body as UTF-8, lossily.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_status(&mut self, status: impl Into<u16>) -> &mut Self {
        self.status = status.into();
        self
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Sets a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_owned(),
            None => self.headers.push((name.to_owned(), value.to_owned())),
        }
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self
    }

    /// `302 Found` to `location`.
    pub fn redirect(&mut self, location: &str) -> &mut Self {
        self.redirect_with(location, StatusCode::FOUND)
    }

    /// Redirect with an explicit status (`301`, `303`, `307`, `308`, ...).
    pub fn redirect_with(&mut self, location: &str, status: impl Into<u16>) -> &mut Self {
        self.set_header("location", location).set_status(status)
    }
}

impl Default for Response {
    fn default() -> Self { Self::new(StatusCode::OK) }
}

impl From<StatusCode> for Response {
    fn from(status: StatusCode) -> Self { Self::new(status) }
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// The closed set of things a handler can hand back.
#[derive(Debug)]
pub enum Reply {
    Body(Vec<u8>),
    Status(u16),
    StatusAndBody(u16, Vec<u8>),
    Full(Response),
    Unchanged,
}

/// Applies a handler's [`Reply`] to the in-flight response.
pub fn prepare_response(reply: Reply, res: &mut Response) {
    match reply {
        Reply::Body(body) => res.body = body,
        Reply::Status(status) => res.status = status,
        Reply::StatusAndBody(status, body) => {
            res.status = status;
            res.body = body;
        }
        Reply::Full(full) => *res = full,
        Reply::Unchanged => {}
    }
}

// ── IntoReply ─────────────────────────────────────────────────────────────────

/// Conversion from a handler's return value into a [`Reply`].
///
/// Implement on your own types to return them directly from handlers.
///
/// ```rust
/// use sprig::{IntoReply, Reply};
///
/// struct Csv(Vec<String>);
///
/// impl IntoReply for Csv {
///     fn into_reply(self) -> Reply {
///         Reply::Body(self.0.join(",").into_bytes())
///     }
/// }
/// ```
pub trait IntoReply {
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply { self }
}

impl IntoReply for Response {
    fn into_reply(self) -> Reply { Reply::Full(self) }
}

impl IntoReply for () {
    fn into_reply(self) -> Reply { Reply::Unchanged }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Reply { Reply::Body(self.as_bytes().to_vec()) }
}

impl IntoReply for String {
    fn into_reply(self) -> Reply { Reply::Body(self.into_bytes()) }
}

impl IntoReply for Vec<u8> {
    fn into_reply(self) -> Reply { Reply::Body(self) }
}

impl IntoReply for u16 {
    fn into_reply(self) -> Reply { Reply::Status(self) }
}

/// Return a status directly from a handler: `return StatusCode::NO_CONTENT`
impl IntoReply for StatusCode {
    fn into_reply(self) -> Reply { Reply::Status(self.as_u16()) }
}

impl<S, B> IntoReply for (S, B)
where
    S: Into<u16>,
    B: Into<Vec<u8>>,
{
    fn into_reply(self) -> Reply { Reply::StatusAndBody(self.0.into(), self.1.into()) }
}
