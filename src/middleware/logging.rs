//! Start/finish log lines around every request.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Logs `[{METHOD} {PATH} {UTC timestamp}] Started.` before the request is
/// handled and `... Finished.` after the response is produced.
///
/// Both lines go through `tracing` at `info` with `method` and `path` as
/// structured fields; the finish line also carries `status`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestLog;

impl Middleware for RequestLog {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let method = req.method().clone();
        let path = req.path().to_owned();

        Box::pin(async move {
            info!(%method, %path, "{}", line(&method, &path, Utc::now(), "Started"));
            let res = next.run(req).await;
            info!(
                %method,
                %path,
                status = res.status_code().as_u16(),
                "{}",
                line(&method, &path, Utc::now(), "Finished"),
            );
            res
        })
    }
}

fn line(method: &http::Method, path: &str, at: DateTime<Utc>, phase: &str) -> String {
    format!("[{method} {path} {}] {phase}.", at.to_rfc3339_opts(SecondsFormat::Secs, true))
}
