//! Route registration: the application builder and its scoped DSL.
//!
//! Routes are declared on a mutable [`Router`] during setup. Two pieces of
//! ambient state shape every declaration: the current path prefix and the
//! current middleware stack. [`Router::namespace`] and [`Router::with`] change
//! them for the duration of a setup closure and put them back afterwards, so
//! blocks nest without leaking into what follows.
//!
//! ```rust
//! use sprig::middleware::{Next, from_fn};
//! use sprig::{Request, Response, Router};
//!
//! let auth = from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
//!     if req.header("authorization").is_some() {
//!         next.run(req, res);
//!     } else {
//!         res.set_status(401u16);
//!     }
//! });
//!
//! let mut app = Router::new();
//! app.get("/", |_: &mut Request, _: &mut Response| "home");
//! app.namespace_with("/admin", [auth], |admin| {
//!     admin.get("/users", |_: &mut Request, _: &mut Response| "users");
//!     admin.namespace("/users", |users| {
//!         users.delete("/:id", |req: &mut Request, _: &mut Response| {
//!             format!("deleted {}", req.param("id").unwrap_or_default())
//!         });
//!     });
//! });
//! app.get("/about", |_: &mut Request, _: &mut Response| "about"); // no prefix, no auth
//!
//! let service = app.build();
//! assert_eq!(service.call(Request::new("GET", "/admin/users")).status(), 401);
//! assert_eq!(service.call(Request::new("GET", "/about")).body(), b"about");
//! ```
//!
//! The prefix is concatenated as-is: `namespace("/api", ..)` around
//! `get("/users", ..)` registers `/api/users`.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::dispatch::{Dispatcher, Service};
use crate::handler::{Handler, Stacked};
use crate::method::{Method, MethodSet};
use crate::middleware::headers::DefaultHeaders;
use crate::middleware::{Chain, Stage, decode};
use crate::path::parse_pattern;
use crate::table::MethodTable;

/// The application builder.
///
/// Build it once at startup, then call [`Router::build`] to get the
/// [`Service`] that serves requests. Registration methods return `&mut Self`
/// so declarations chain.
pub struct Router {
    table: MethodTable,
    prefix: String,
    stack: Vec<Stage>,
    global: Vec<Stage>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            table: MethodTable::new(),
            prefix: String::new(),
            stack: Vec::new(),
            global: Vec::new(),
        }
    }

    /// Current path prefix (empty outside any namespace).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of route middleware stages in effect.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Registers a handler for every method in `methods` under `prefix + path`.
    ///
    /// Path parameters use `:name` syntax; `req.param("name")` retrieves them.
    /// Registering the same method and pattern twice keeps the second handler.
    ///
    /// ```rust
    /// # use sprig::{Method, Request, Response, Router};
    /// # fn save(_: &mut Request, _: &mut Response) -> &'static str { "" }
    /// let mut app = Router::new();
    /// app.on(Method::Post | Method::Put, "/items/:id", save);
    /// ```
    pub fn on(&mut self, methods: impl Into<MethodSet>, path: &str, handler: impl Handler) -> &mut Self {
        let methods = methods.into();
        let full = format!("{}{}", self.prefix, path);
        let handler = if self.stack.is_empty() {
            handler.into_boxed_handler()
        } else {
            Stacked::wrap(&self.stack, handler.into_boxed_handler())
        };
        debug!(?methods, path = %full, middleware = self.stack.len(), "route registered");
        self.table.register_route(methods, &parse_pattern(&full), handler);
        self
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Put, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Patch, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Delete, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Options, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Head, path, handler)
    }

    /// Every routable method.
    pub fn any(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(MethodSet::all(), path, handler)
    }

    // ── Scopes ────────────────────────────────────────────────────────────────

    /// Appends `prefix` until the returned guard is dropped.
    pub fn scope_prefix(&mut self, prefix: &str) -> PrefixScope<'_> {
        let saved = self.prefix.len();
        self.prefix.push_str(prefix);
        PrefixScope { router: self, saved }
    }

    /// Pushes `stages` onto the route middleware stack until the returned guard is dropped.
    pub fn scope_stack(&mut self, stages: impl IntoIterator<Item = Stage>) -> StackScope<'_> {
        let saved = self.stack.len();
        self.stack.extend(stages);
        StackScope { router: self, saved }
    }

    /// Runs `setup` with `prefix` appended to the current prefix.
    pub fn namespace(&mut self, prefix: &str, setup: impl FnOnce(&mut Router)) -> &mut Self {
        {
            let mut scope = self.scope_prefix(prefix);
            setup(&mut *scope);
        }
        self
    }

    /// Runs `setup` with `stages` added to every route it declares.
    pub fn with(
        &mut self,
        stages: impl IntoIterator<Item = Stage>,
        setup: impl FnOnce(&mut Router),
    ) -> &mut Self {
        {
            let mut scope = self.scope_stack(stages);
            setup(&mut *scope);
        }
        self
    }

    /// [`namespace`](Router::namespace) inside [`with`](Router::with).
    pub fn namespace_with(
        &mut self,
        prefix: &str,
        stages: impl IntoIterator<Item = Stage>,
        setup: impl FnOnce(&mut Router),
    ) -> &mut Self {
        self.with(stages, |router| {
            router.namespace(prefix, setup);
        })
    }

    /// Adds an application-wide stage, run for every request (matched or
    /// not) after the built-in decoders and before routing.
    pub fn wrap(&mut self, stage: Stage) -> &mut Self {
        self.global.push(stage);
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────────

    /// Freezes the routes into a [`Service`] using [`Config::default`].
    pub fn build(self) -> Service {
        self.build_with(&Config::default())
    }

    /// Freezes the routes into a [`Service`].
    ///
    /// The chain is: default headers, query decoder, cookie decoder, form
    /// decoder, the stages added with [`wrap`](Router::wrap), the dispatcher.
    pub fn build_with(self, config: &Config) -> Service {
        let mut chain: Chain = [
            DefaultHeaders::new(config.default_headers.clone()).into_stage(),
            decode::query(),
            decode::cookies(),
            decode::form(),
        ]
        .into_iter()
        .collect();
        chain.extend(self.global);
        chain.push(Arc::new(Dispatcher::new(self.table)));
        Service::new(chain)
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Scope guards ──────────────────────────────────────────────────────────────

/// Restores the router's prefix when dropped. Derefs to the [`Router`].
pub struct PrefixScope<'a> {
    router: &'a mut Router,
    saved: usize,
}

impl Deref for PrefixScope<'_> {
    type Target = Router;
    fn deref(&self) -> &Router { self.router }
}

impl DerefMut for PrefixScope<'_> {
    fn deref_mut(&mut self) -> &mut Router { self.router }
}

impl Drop for PrefixScope<'_> {
    fn drop(&mut self) {
        self.router.prefix.truncate(self.saved);
    }
}

/// Restores the router's middleware stack when dropped. Derefs to the [`Router`].
pub struct StackScope<'a> {
    router: &'a mut Router,
    saved: usize,
}

impl Deref for StackScope<'_> {
    type Target = Router;
    fn deref(&self) -> &Router { self.router }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut Router { self.router }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        self.router.stack.truncate(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{Next, from_fn};
    use crate::request::Request;
    use crate::response::Response;

    fn echo_path(req: &mut Request, _: &mut Response) -> String {
        req.path().to_owned()
    }

    fn mark(label: &'static str) -> Stage {
        from_fn(move |req: &mut Request, res: &mut Response, next: Next<'_>| {
            let seen = res.header("x-mark").map(|v| format!("{v},{label}")).unwrap_or(label.to_owned());
            res.set_header("x-mark", &seen);
            next.run(req, res);
        })
    }

    fn get(service: &Service, path: &str) -> Response {
        service.call(Request::new("GET", path))
    }

    #[test]
    fn namespace_restores_prefix() {
        let mut app = Router::new();
        app.namespace("/api", |api| {
            assert_eq!(api.prefix(), "/api");
            api.namespace("/v1", |v1| {
                assert_eq!(v1.prefix(), "/api/v1");
                v1.get("/users", echo_path);
            });
            assert_eq!(api.prefix(), "/api");
            api.get("/health", echo_path);
        });
        assert_eq!(app.prefix(), "");
        app.get("/users", echo_path);

        let service = app.build();
        assert_eq!(get(&service, "/api/v1/users").status(), 200);
        assert_eq!(get(&service, "/api/health").status(), 200);
        assert_eq!(get(&service, "/users").status(), 200);
        assert_eq!(get(&service, "/api/users").status(), 404);
    }

    #[test]
    fn with_restores_stack() {
        let mut app = Router::new();
        app.with([mark("outer")], |outer| {
            outer.get("/one", echo_path);
            outer.with([mark("inner")], |inner| {
                assert_eq!(inner.stack_depth(), 2);
                inner.get("/two", echo_path);
            });
            assert_eq!(outer.stack_depth(), 1);
            outer.get("/three", echo_path);
        });
        assert_eq!(app.stack_depth(), 0);
        app.get("/four", echo_path);

        let service = app.build();
        assert_eq!(get(&service, "/one").header("x-mark"), Some("outer"));
        assert_eq!(get(&service, "/two").header("x-mark"), Some("outer,inner"));
        assert_eq!(get(&service, "/three").header("x-mark"), Some("outer"));
        assert_eq!(get(&service, "/four").header("x-mark"), None);
    }

    #[test]
    fn namespace_with_combines_both() {
        let mut app = Router::new();
        app.namespace_with("/admin", [mark("admin")], |admin| {
            admin.get("/panel", echo_path);
        });
        assert_eq!((app.prefix(), app.stack_depth()), ("", 0));

        let res = get(&app.build(), "/admin/panel");
        assert_eq!(res.body(), b"/admin/panel");
        assert_eq!(res.header("x-mark"), Some("admin"));
    }

    #[test]
    fn guards_restore_on_early_return() {
        fn declare(router: &mut Router, bail: bool) -> Option<()> {
            let mut scope = router.scope_prefix("/early");
            let mut scope = scope.scope_stack([mark("m")]);
            scope.get("/kept", echo_path);
            if bail {
                return None;
            }
            scope.get("/skipped", echo_path);
            Some(())
        }

        let mut app = Router::new();
        assert!(declare(&mut app, true).is_none());
        assert_eq!((app.prefix(), app.stack_depth()), ("", 0));
        app.get("/after", echo_path);

        let service = app.build();
        assert_eq!(get(&service, "/early/kept").header("x-mark"), Some("m"));
        assert_eq!(get(&service, "/early/skipped").status(), 404);
        assert_eq!(get(&service, "/after").header("x-mark"), None);
    }

    #[test]
    fn scopes_unwind_when_setup_panics() {
        let mut app = Router::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            app.namespace("/x", |x| {
                x.get("/before", echo_path);
                x.with([mark("m")], |_| panic!("setup failed"));
            });
        }));
        assert!(outcome.is_err());
        assert_eq!((app.prefix(), app.stack_depth()), ("", 0));
        app.get("/after", echo_path);

        let service = app.build();
        assert_eq!(get(&service, "/x/before").body(), b"/x/before");
        let after = get(&service, "/after");
        assert_eq!((after.status(), after.header("x-mark")), (200, None));
        assert_eq!(get(&service, "/x/after").status(), 404);
    }

    #[test]
    fn route_middleware_can_short_circuit() {
        let deny = from_fn(|_: &mut Request, res: &mut Response, _: Next<'_>| {
            res.set_status(403u16).set_body("nope");
        });
        let mut app = Router::new();
        app.with([deny], |r| {
            r.get("/secret", |_: &mut Request, _: &mut Response| -> &'static str {
                unreachable!("guarded handler ran")
            });
        });

        let res = get(&app.build(), "/secret");
        assert_eq!((res.status(), res.body()), (403, &b"nope"[..]));
    }

    #[test]
    fn global_stages_run_for_misses_too() {
        let mut app = Router::new();
        app.wrap(mark("global"));
        app.get("/", echo_path);

        let service = app.build();
        assert_eq!(get(&service, "/").header("x-mark"), Some("global"));
        let miss = get(&service, "/missing");
        assert_eq!(miss.status(), 404);
        assert_eq!(miss.header("x-mark"), Some("global"));
        assert!(miss.body().is_empty());
    }

    #[test]
    fn any_registers_every_method() {
        let mut app = Router::new();
        app.any("/ping", |_: &mut Request, _: &mut Response| "pong");
        let service = app.build();
        for method in Method::ALL {
            assert_eq!(service.call(Request::new(method.as_str(), "/ping")).body(), b"pong");
        }
    }

    #[test]
    fn default_headers_come_from_config() {
        let mut app = Router::new();
        app.get("/", echo_path);
        let config = Config {
            default_headers: [("x-powered-by".to_owned(), "sprig".to_owned())].into(),
            ..Config::default()
        };
        let res = app.build_with(&config).call(Request::new("GET", "/"));
        assert_eq!(res.header("x-powered-by"), Some("sprig"));
        assert_eq!(res.header("content-type"), None);
    }
}
