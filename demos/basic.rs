//! Minimal sprig example: a few pages, a namespaced JSON-ish API behind a
//! token check, and a login form that redirects.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/about
//!   curl http://localhost:3000/api/users/42                      # 401
//!   curl -H 'authorization: token' http://localhost:3000/api/users/42
//!   curl -i -X POST http://localhost:3000/login -d 'user=ann'

use sprig::middleware::{Next, from_fn};
use sprig::{Config, IntoReply, Reply, Request, Response, Router, Server};

#[tokio::main]
async fn main() -> Result<(), sprig::Error> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let require_token = from_fn(|req: &mut Request, res: &mut Response, next: Next<'_>| {
        if req.header("authorization").is_none() {
            res.set_status(401u16).set_body("token required");
            return;
        }
        next.run(req, res);
    });

    let mut app = Router::new();
    app.get("/", |_: &mut Request, _: &mut Response| "<h1>sprig</h1>")
        .get("/about", |_: &mut Request, _: &mut Response| "running")
        .post("/login", login);

    app.namespace_with("/api", [require_token], |api| {
        api.namespace("/users", |users| {
            users
                .get("/:id", get_user)
                .delete("/:id", |_: &mut Request, _: &mut Response| 204u16);
        });
    });

    Server::from_config(&config)?.serve(app.build_with(&config)).await
}

// GET /api/users/:id
fn get_user(req: &mut Request, res: &mut Response) -> String {
    res.set_header("content-type", "application/json");
    let id = req.param("id").unwrap_or_default();
    format!(r#"{{"id":"{id}","name":"alice"}}"#)
}

// POST /login → 303 back home with a cookie, or 400 without a user name
fn login(req: &mut Request, res: &mut Response) -> Reply {
    let Some(user) = req.form("user") else {
        return (400u16, "user required").into_reply();
    };
    res.set_header("set-cookie", &format!("user={user}; HttpOnly"));
    res.redirect_with("/", 303u16);
    Reply::Unchanged
}
