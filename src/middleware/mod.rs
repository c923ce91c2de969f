//! Middleware layer.
//!
//! Middleware intercepts requests before routing and responses after the
//! handler. A middleware either answers on its own (the [`Redirect`] rule)
//! or hands the request to [`Next::run`] and observes the result (the
//! [`RequestLog`] lines).
//!
//! ```rust
//! use tsu_todos::Router;
//! use tsu_todos::middleware::{Redirect, RequestLog};
//!
//! let app = Router::new()
//!     .layer(Redirect::found("/tasks/", "/todos/"))
//!     .layer(RequestLog);
//! ```

mod logging;
mod redirect;

use std::sync::Arc;

pub use logging::RequestLog;
pub use redirect::Redirect;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::router::Router;

/// A request/response interceptor registered with [`Router::layer`].
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The rest of the chain after the current middleware.
///
/// Owns an `Arc` to the router so the returned future is `'static` and can
/// be polled on any worker thread.
pub struct Next {
    router: Arc<Router>,
    index: usize,
}

impl Next {
    pub(crate) fn new(router: Arc<Router>) -> Self {
        Self { router, index: 0 }
    }

    /// Passes `req` to the next middleware, or to the matched route once the
    /// stack is exhausted.
    pub fn run(self, req: Request) -> BoxFuture {
        match self.router.layers.get(self.index) {
            Some(layer) => {
                let layer = Arc::clone(layer);
                let next = Next { router: self.router, index: self.index + 1 };
                layer.handle(req, next)
            }
            None => self.router.route(req),
        }
    }
}
