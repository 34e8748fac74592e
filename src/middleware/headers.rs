//! Default response headers.

use crate::middleware::{Middleware, Next, Stage, stage};
use crate::request::Request;
use crate::response::Response;

/// Sets a fixed list of headers before the rest of the chain runs.
///
/// Later stages and handlers can overwrite any of them.
#[derive(Clone, Debug, Default)]
pub struct DefaultHeaders {
    headers: Vec<(String, String)>,
}

impl DefaultHeaders {
    pub fn new<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { headers: headers.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn into_stage(self) -> Stage {
        stage(self)
    }
}

impl Middleware for DefaultHeaders {
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        for (name, value) in &self.headers {
            res.set_header(name, value);
        }
        next.run(req, res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Chain, from_fn};

    #[test]
    fn defaults_apply_and_can_be_overridden() {
        let defaults = DefaultHeaders::new([("content-type", "text/html"), ("x-frame-options", "DENY")]);
        let handler = from_fn(|_: &mut Request, res: &mut Response, _: Next<'_>| {
            res.set_header("Content-Type", "application/json");
        });
        let chain: Chain = [defaults.into_stage(), handler].into_iter().collect();

        let mut res = Response::default();
        chain.execute(&mut Request::new("GET", "/"), &mut res);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.header("x-frame-options"), Some("DENY"));
        assert_eq!(res.headers().len(), 2);
    }
}
