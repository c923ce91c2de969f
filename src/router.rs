//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Middleware registered
//! with [`Router::layer`] wraps every request, matched or not.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    pub(crate) layers: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use tsu_todos::{Method, Request, Response, Router};
    /// # async fn get_todo(_: Request) -> Response { Response::text("") }
    /// # async fn delete_todo(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Delete, "/todos/{id}", delete_todo)
    ///     .on(Method::Get,    "/todos/{id}", get_todo);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Wraps every request in `middleware`. The first layer added is the
    /// outermost: it sees the request first and the response last.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Runs one request through the middleware stack and the routing table.
    pub async fn handle(self: &Arc<Self>, req: Request) -> Response {
        Next::new(Arc::clone(self)).run(req).await
    }

    /// Innermost step of the chain: match the route and call its handler.
    ///
    /// Unmatched paths get `404`. A path registered under other methods gets
    /// `405` with an `allow` header.
    pub(crate) fn route(&self, mut req: Request) -> BoxFuture {
        let matched = Method::try_from(req.method())
            .ok()
            .and_then(|method| self.lookup(method, req.path()));

        if let Some((handler, params)) = matched {
            req.set_params(params);
            return handler.call(req);
        }

        let allowed = self.allowed_methods(req.path());
        let response = if allowed.is_empty() {
            Response::status(Status::NotFound)
        } else {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            Response::builder()
                .status(Status::MethodNotAllowed)
                .header("allow", &allow)
                .no_body()
        };
        Box::pin(async move { response })
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        allowed.sort();
        allowed
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
