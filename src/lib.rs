//! # sprig
//!
//! The routing and dispatch core of a small synchronous web framework.
//!
//! ## What is here
//!
//! - **Per-method segment tries**: `/users/:id` style patterns, literal
//!   segments always beating parameters, trailing slashes ignored.
//! - **Middleware chains**: ordered stages that mutate a shared request
//!   context and response, any of which may answer early.
//! - **Scoped registration**: `namespace` and `with` blocks share a path
//!   prefix or a middleware stack with every route declared inside them.
//! - **Loose handler returns**: a string, a status, a `(status, body)` pair or
//!   a whole [`Response`].
//!
//! A thin hyper-based [`Server`] is included to put a [`Service`] on the
//! network; TLS, rate limiting and connection management belong to whatever
//! sits in front of it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sprig::{Config, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sprig::Error> {
//!     let config = Config::default();
//!
//!     let mut app = Router::new();
//!     app.get("/about", about)
//!         .get("/users/:id", get_user)
//!         .post("/users", create_user);
//!
//!     Server::from_config(&config)?.serve(app.build_with(&config)).await
//! }
//!
//! fn about(_: &mut Request, _: &mut Response) -> &'static str {
//!     "running"
//! }
//!
//! fn get_user(req: &mut Request, _: &mut Response) -> String {
//!     format!("user {}", req.param("id").unwrap_or_default())
//! }
//!
//! fn create_user(req: &mut Request, res: &mut Response) -> (u16, String) {
//!     match req.form("name") {
//!         Some(name) => {
//!             res.set_header("location", "/users/99");
//!             (201, format!("created {name}"))
//!         }
//!         None => (400, "name required".to_owned()),
//!     }
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod handler;
mod method;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod path;
pub mod request;
pub mod table;
pub mod trie;
pub mod validate;

pub use config::Config;
pub use dispatch::Service;
pub use error::Error;
pub use handler::Handler;
pub use method::{Method, MethodSet};
pub use request::Request;
pub use response::{IntoReply, Reply, Response, prepare_response};
pub use router::{PrefixScope, Router, StackScope};
pub use server::Server;
