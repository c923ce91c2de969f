//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the process serve traffic? |

use serde::Serialize;

use crate::response::Json;
use crate::store::SharedStore;
use crate::Request;
use crate::Response;

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub todos: usize,
}

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with the current number of stored todos. The store lives in
/// memory, so there is nothing to wait for.
pub async fn readiness(store: SharedStore, _req: Request) -> Json<Readiness> {
    Json(Readiness { status: "ready", todos: store.len() })
}
