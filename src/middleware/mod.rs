//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: decoding, default headers, authentication checks,
//! request-scoped logging.
//!
//! A stage receives the request context, the in-flight response and a
//! [`Next`] cursor over the stages after it. Calling [`Next::run`] continues
//! the chain; returning without calling it short-circuits, and the response
//! as the stage left it is what goes out.
//!
//! ```rust
//! use sprig::middleware::{Chain, Next, from_fn};
//! use sprig::{Request, Response};
//!
//! let chain: Chain = [
//!     from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
//!         if req.header("authorization").is_none() {
//!             res.set_status(401u16);
//!             return;
//!         }
//!         next.run(req, res);
//!     }),
//!     from_fn(|_: &mut Request, res: &mut Response, _: Next<'_>| {
//!         res.set_body("secret");
//!     }),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut res = Response::default();
//! chain.execute(&mut Request::new("GET", "/"), &mut res);
//! assert_eq!(res.status(), 401);
//! ```

pub mod decode;
pub mod headers;

use std::fmt;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// One processing stage.
///
/// Stages hold configuration, never per-request state, so one instance can
/// sit in any number of chains.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>);
}

impl<F> Middleware for F
where
    F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
{
    fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        self(req, res, next)
    }
}

/// A shared, type-erased stage.
pub type Stage = Arc<dyn Middleware>;

/// Wraps a closure as a [`Stage`].
pub fn from_fn<F>(f: F) -> Stage
where
    F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a [`Middleware`] value as a [`Stage`].
pub fn stage<M: Middleware>(middleware: M) -> Stage {
    Arc::new(middleware)
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// Cursor over the stages that have not run yet.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Stage],
}

impl<'a> Next<'a> {
    /// Runs the next stage. At the end of the chain this does nothing.
    pub fn run(self, req: &mut Request, res: &mut Response) {
        if let Some((stage, rest)) = self.stages.split_first() {
            stage.handle(req, res, Next { stages: rest });
        }
    }

    pub fn remaining(&self) -> usize {
        self.stages.len()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("remaining", &self.remaining()).finish()
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// An ordered list of stages, executed front to back.
#[derive(Clone, Default)]
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: Stage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// `self` followed by `other`.
    pub fn concat(mut self, other: &Chain) -> Self {
        self.stages.extend(other.stages.iter().cloned());
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs the chain for one request.
    pub fn execute(&self, req: &mut Request, res: &mut Response) {
        Next { stages: &self.stages }.run(req, res);
    }
}

impl FromIterator<Stage> for Chain {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self { stages: iter.into_iter().collect() }
    }
}

impl Extend<Stage> for Chain {
    fn extend<I: IntoIterator<Item = Stage>>(&mut self, iter: I) {
        self.stages.extend(iter);
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("stages", &self.stages.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(label: &'static str) -> Stage {
        from_fn(move |req: &mut Request, res: &mut Response, next: Next<'_>| {
            let mut body = res.body().to_vec();
            body.extend_from_slice(label.as_bytes());
            res.set_body(body);
            next.run(req, res);
        })
    }

    fn run(chain: &Chain) -> Response {
        let mut res = Response::default();
        chain.execute(&mut Request::new("GET", "/"), &mut res);
        res
    }

    #[test]
    fn stages_run_front_to_back() {
        let chain: Chain = [tag("a"), tag("b"), tag("c")].into_iter().collect();
        assert_eq!(run(&chain).body(), b"abc");
    }

    #[test]
    fn stage_that_skips_next_short_circuits() {
        let stop = from_fn(|_: &mut Request, res: &mut Response, next: Next<'_>| {
            assert_eq!(next.remaining(), 1);
            res.set_status(404u16);
        });
        let chain: Chain = [tag("a"), stop, tag("never")].into_iter().collect();
        let res = run(&chain);
        assert_eq!((res.status(), res.body()), (404, &b"a"[..]));
    }

    #[test]
    fn stages_see_changes_made_after_next_returns() {
        let outer = from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
            next.run(req, res);
            let status = res.status().to_string();
            res.set_header("x-after", &status);
        });
        let inner = from_fn(|_: &mut Request, res: &mut Response, _: Next<'_>| {
            res.set_status(201u16);
        });
        let chain: Chain = [outer, inner].into_iter().collect();
        assert_eq!(run(&chain).header("x-after"), Some("201"));
    }

    #[test]
    fn concat_preserves_order_and_shares_stages() {
        let shared = tag("s");
        let front: Chain = [tag("1"), Arc::clone(&shared)].into_iter().collect();
        let back: Chain = [shared].into_iter().collect();
        let chain = front.concat(&back);
        assert_eq!(chain.len(), 3);
        assert_eq!(run(&chain).body(), b"1ss");
    }

    #[test]
    fn empty_chain_leaves_response_untouched() {
        assert_eq!(run(&Chain::new()), Response::default());
    }
}
