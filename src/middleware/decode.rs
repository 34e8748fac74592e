//! Built-in decoding stages.
//!
//! Each stage parses one part of the raw request into a [`Params`] store on
//! the context and always continues the chain.

use url::form_urlencoded;

use crate::middleware::{Next, Stage, from_fn};
use crate::request::{COOKIES, DATA, Params, Request, URL_PARAMS};
use crate::response::Response;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Query string → [`URL_PARAMS`]. A repeated name keeps its last value.
pub fn query() -> Stage {
    from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
        let params = parse_urlencoded(req.query().as_bytes());
        req.set_params(URL_PARAMS, params);
        next.run(req, res);
    })
}

/// `cookie` header → [`COOKIES`].
pub fn cookies() -> Stage {
    from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
        let params = req.header("cookie").map(parse_cookies).unwrap_or_default();
        req.set_params(COOKIES, params);
        next.run(req, res);
    })
}

/// Urlencoded body → [`DATA`]. Other content types leave an empty store.
pub fn form() -> Stage {
    from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
        let is_form = req
            .header("content-type")
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE));
        let params = if is_form { parse_urlencoded(req.body()) } else { Params::new() };
        req.set_params(DATA, params);
        next.run(req, res);
    })
}

fn parse_urlencoded(input: &[u8]) -> Params {
    form_urlencoded::parse(input).into_owned().collect()
}

fn parse_cookies(header: &str) -> Params {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().trim_matches('"').to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}
