//! # oxide-dispatch
//!
//! An ordered request router with route groups, middleware and controller
//! dispatch.
//!
//! This crate provides:
//! - `{name}` path templates compiled to anchored matchers
//! - First-match routing in registration order, per HTTP method
//! - Route groups with a shared prefix and middleware
//! - Per-route middleware and controller namespaces
//! - Controller references (`"UserController::show"`) resolved through a registry
//! - Named routes for reverse URL lookup
//!
//! ## Quick Start
//!
//! ```
//! use oxide_dispatch::{Params, Response, Router};
//!
//! fn hello(_: &Params) -> Response {
//!     Response::text("Hello, World!")
//! }
//!
//! fn user(params: &Params) -> Response {
//!     Response::text(format!("User {}", params.get(0).unwrap_or("unknown")))
//! }
//!
//! let router = Router::builder()
//!     .get("/", hello)
//!     .get("/users/{id}", user)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(router.run("GET", "/users/123").body, "User 123");
//! assert_eq!(router.run("GET", "/missing").status, 404);
//! ```
//!
//! ## Path Parameters
//!
//! Each `{name}` placeholder matches one or more characters other than `/`.
//! Handlers receive the captured values positionally:
//!
//! ```ignore
//! router.get("/posts/{post_id}/comments/{comment_id}", |p: &Params| {
//!     let post_id = p.get(0).unwrap();
//!     let comment_id = p.named("comment_id").unwrap();
//!     // ...
//! })
//! ```
//!
//! ## Route Groups and Middleware
//!
//! ```ignore
//! use oxide_dispatch::{GroupAttributes, LoggingMiddleware, Router};
//!
//! let router = Router::builder()
//!     .group(
//!         GroupAttributes::new("admin").prefix("/admin").middleware(LoggingMiddleware),
//!         |r| r.get("/users", list_users).middleware(Audit).delete("/users/{id}", delete_user),
//!     )
//!     .build()?;
//! ```
//!
//! Middleware staged with `middleware()` applies to the next registered route
//! only, and runs after the group's middleware.
//!
//! ## Controllers
//!
//! ```ignore
//! let mut controllers = ControllerRegistry::new();
//! controllers
//!     .register("App\\UserController", UserController::default)
//!     .action("create", UserController::create);
//!
//! let router = Router::builder()
//!     .controllers(controllers)
//!     .namespace("App")
//!     .post("/user", "UserController::create")
//!     .build()?;
//! ```
//!
//! ## Named Routes
//!
//! ```ignore
//! let router = Router::builder()
//!     .get("/user/{id}", profile)
//!     .name("profile")
//!     .build()?;
//!
//! assert_eq!(router.url_for("profile", [("id", 42)]), Some("/user/42".to_string()));
//! ```

mod config;
mod error;
mod group;
mod handler;
mod middleware;
pub mod path;
mod render;
mod request;
mod response;
mod router;

pub use config::{RouterConfig, DEFAULT_CALLBACK_SEPARATOR, DEFAULT_NAMESPACE_SEPARATOR};
pub use error::{Result, RouterError};
pub use group::GroupAttributes;
pub use handler::{ControllerBuilder, ControllerRegistry, Handler, HandlerFn, IntoHandler};
pub use middleware::{LoggingMiddleware, Middleware, MiddlewareResult};
pub use path::{PathPattern, PathSegment};
pub use render::{ErrorRenderer, PlainErrorRenderer};
pub use request::{Method, Params, Request};
pub use response::Response;
pub use router::{Route, Router, RouterBuilder};
