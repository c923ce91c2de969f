//! Path-prefix redirect rule.

use tracing::debug;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Answers any request whose path starts with `from` with a redirect to the
/// same path under `to`. The query string is carried over; the request never
/// reaches the router.
///
/// `Redirect::found("/tasks/", "/todos/")` sends `/tasks/7?x=1` to
/// `/todos/7?x=1` with `302 Found`. `/tasks` (no trailing slash) is not
/// matched.
#[derive(Clone, Debug)]
pub struct Redirect {
    from: String,
    to: String,
    status: Status,
}

impl Redirect {
    /// Redirect with `302 Found`.
    pub fn found(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_status(from, to, Status::Found)
    }

    /// Redirect with any 3xx status. Non-redirect statuses fall back to
    /// `302 Found`.
    pub fn with_status(from: impl Into<String>, to: impl Into<String>, status: Status) -> Self {
        let status = if status.is_redirect() { status } else { Status::Found };
        Self { from: from.into(), to: to.into(), status }
    }

    /// The redirect target for `path`/`query`, if the rule applies.
    fn location(&self, path: &str, query: Option<&str>) -> Option<String> {
        let rest = path.strip_prefix(self.from.as_str())?;
        let mut location = format!("{}{rest}", self.to);
        if let Some(q) = query {
            location.push('?');
            location.push_str(q);
        }
        Some(location)
    }
}

impl Middleware for Redirect {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        match self.location(req.path(), req.query()) {
            Some(location) => {
                debug!(from = req.path(), to = %location, "redirecting");
                let res = Response::builder()
                    .status(self.status)
                    .header("location", &location)
                    .no_body();
                Box::pin(async move { res })
            }
            None => next.run(req),
        }
    }
}
