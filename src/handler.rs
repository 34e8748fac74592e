//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The routing table holds handlers of *different* types in one tree per
//! method, so each is hidden behind a trait object (`dyn ErasedHandler`).
//!
//! ```text
//! fn hello(req: &mut Request, res: &mut Response) -> &'static str   ← user writes this
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                  ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                  ← stored as BoxedHandler
//!        ↓ at request time
//! handler.call(req, res) -> Reply             ← one vtable dispatch
//! ```
//!
//! A route declared inside a `with` block is stored as a [`Stacked`] handler
//! instead: the block's middleware followed by a final stage that runs the
//! plain handler.

use std::sync::Arc;

use crate::middleware::{Chain, Middleware, Next};
use crate::request::Request;
use crate::response::{IntoReply, Reply, Response, prepare_response};

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: &mut Request, res: &mut Response) -> Reply;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// function or closure with the signature:
///
/// ```text
/// fn name(req: &mut Request, res: &mut Response) -> impl IntoReply
/// ```
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, R> private::Sealed for F
where
    F: Fn(&mut Request, &mut Response) -> R + Send + Sync + 'static,
    R: IntoReply,
{
}

impl<F, R> Handler for F
where
    F: Fn(&mut Request, &mut Response) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, R> ErasedHandler for FnHandler<F>
where
    F: Fn(&mut Request, &mut Response) -> R,
    R: IntoReply,
{
    fn call(&self, req: &mut Request, res: &mut Response) -> Reply {
        (self.0)(req, res).into_reply()
    }
}

// ── Middleware-wrapped handler ────────────────────────────────────────────────

/// A handler behind its route's middleware.
///
/// Calling it runs the chain; the last stage invokes the plain handler and
/// normalizes its reply into the shared response. The finished response is
/// handed back as [`Reply::Full`], so whoever called this sees the same
/// contract as for a plain handler.
pub(crate) struct Stacked {
    chain: Chain,
}

impl Stacked {
    pub(crate) fn wrap(stages: &[Arc<dyn Middleware>], handler: BoxedHandler) -> BoxedHandler {
        let mut chain: Chain = stages.iter().cloned().collect();
        chain.push(Arc::new(Endpoint(handler)));
        Arc::new(Self { chain })
    }
}

impl ErasedHandler for Stacked {
    fn call(&self, req: &mut Request, res: &mut Response) -> Reply {
        self.chain.execute(req, res);
        Reply::Full(std::mem::take(res))
    }
}

struct Endpoint(BoxedHandler);

impl Middleware for Endpoint {
    fn handle(&self, req: &mut Request, res: &mut Response, _next: Next<'_>) {
        let reply = self.0.call(req, res);
        prepare_response(reply, res);
    }
}
