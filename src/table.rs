//! One routing trie per HTTP method.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::method::{Method, MethodSet};
use crate::path::Segment;
use crate::request::Params;
use crate::trie::Trie;

/// The method → trie table.
///
/// Every method in [`Method::ALL`] gets an empty trie up front; the set of
/// tries never changes afterwards, only their contents.
pub struct MethodTable {
    tries: HashMap<Method, Trie<BoxedHandler>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self { tries: Method::ALL.into_iter().map(|m| (m, Trie::new())).collect() }
    }

    /// Inserts `handler` under `pattern` into the trie of every method in `methods`.
    ///
    /// The tries share no nodes; each gets its own entry.
    pub fn register_route(&mut self, methods: MethodSet, pattern: &[Segment], handler: BoxedHandler) {
        for method in methods.iter() {
            self.tries
                .entry(method)
                .or_default()
                .insert(pattern, Arc::clone(&handler));
        }
    }

    /// Resolves a method token and concrete path segments.
    ///
    /// An unknown method token is a miss, same as an unknown path.
    pub fn lookup(&self, method: &str, segments: &[&str]) -> Option<(BoxedHandler, Params)> {
        let method: Method = method.parse().ok()?;
        let (handler, params) = self.tries.get(&method)?.at(segments)?;
        Some((Arc::clone(handler), params))
    }
}

impl Default for MethodTable {
    fn default() -> Self { Self::new() }
}
