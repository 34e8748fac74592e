//! The dispatch stage and the finished, request-serving [`Service`].

use tracing::{debug, trace};

use crate::middleware::{Chain, Middleware, Next};
use crate::path::split_decoded;
use crate::request::{ROUTE_PARAMS, Request};
use crate::response::{Response, prepare_response};
use crate::table::MethodTable;

/// Final stage of every application chain: route, call, normalize.
///
/// A miss (unknown path or unroutable method) becomes `404` with an empty
/// body. Stages after the dispatcher are never reached.
pub(crate) struct Dispatcher {
    table: MethodTable,
}

impl Dispatcher {
    pub(crate) fn new(table: MethodTable) -> Self {
        Self { table }
    }
}

impl Middleware for Dispatcher {
    fn handle(&self, req: &mut Request, res: &mut Response, _next: Next<'_>) {
        let decoded = split_decoded(req.path());
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let found = self.table.lookup(req.method(), &segments);
        let Some((handler, params)) = found else {
            debug!(method = %req.method(), path = %req.path(), "no route");
            res.set_status(404u16);
            res.body.clear();
            return;
        };

        trace!(method = %req.method(), path = %req.path(), ?params, "route matched");
        req.set_params(ROUTE_PARAMS, params);
        let reply = handler.call(req, res);
        prepare_response(reply, res);
    }
}

/// A built application: the fixed chain every request runs through.
///
/// `Service` holds no registration state and is never mutated, so one
/// instance behind an `Arc` serves any number of threads.
#[derive(Debug)]
pub struct Service {
    chain: Chain,
}

impl Service {
    pub(crate) fn new(chain: Chain) -> Self {
        Self { chain }
    }

    /// Runs `req` through the chain, starting from a `200` response with no body.
    pub fn call(&self, mut req: Request) -> Response {
        self.handle(&mut req)
    }

    /// Like [`call`](Service::call), leaving the context with the caller
    /// (useful for inspecting what stages recorded).
    pub fn handle(&self, req: &mut Request) -> Response {
        let mut res = Response::default();
        self.chain.execute(req, &mut res);
        res
    }
}
