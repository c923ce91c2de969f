//! # tsu-todos
//!
//! An in-memory todo service on a minimal hyper-based HTTP layer.
//!
//! ## Layout
//!
//! - [`Todo`], [`TaskStore`] and [`validate_new_todo`]: the business core.
//! - [`api`]: the `/todos` routes and how store results map to HTTP.
//! - [`Router`], [`Request`], [`Response`], [`middleware`], [`Server`]: the
//!   HTTP plumbing. Radix-tree routing via [`matchit`], HTTP/1.1 and HTTP/2
//!   via hyper, graceful shutdown on SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tsu_todos::{InMemoryTaskStore, Server, api, middleware::Redirect};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_todos::Error> {
//!     let app = api::app(InMemoryTaskStore::shared(), Redirect::found("/tasks/", "/todos/"));
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod problem;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;
mod todo;
mod validation;

pub mod api;
pub mod config;
pub mod health;
pub mod middleware;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::Method;
pub use problem::{FieldErrors, ProblemDetails};
pub use request::{BodyError, Request};
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{DEFAULT_BODY_LIMIT, Server, serve_with_shutdown};
pub use status::Status;
pub use store::{InMemoryTaskStore, SharedStore, StoreError, TaskStore};
pub use todo::Todo;
pub use validation::{
    ALREADY_COMPLETED, DUE_DATE_FIELD, DUE_DATE_IN_PAST, IS_COMPLETED_FIELD, validate_new_todo,
};
