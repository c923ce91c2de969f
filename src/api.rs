//! The `/todos` HTTP surface.
//!
//! | Method | Path          | Success                 | Failure                      |
//! |--------|---------------|-------------------------|------------------------------|
//! | GET    | `/todos`      | 200, array of todos     | —                            |
//! | GET    | `/todos/{id}` | 200, todo               | 404 absent, 400 bad id       |
//! | POST   | `/todos`      | 201, todo, `location`   | 400 validation / body, 415   |
//! | DELETE | `/todos/{id}` | 204                     | 400 bad id                   |
//!
//! Plus `/healthz` and `/readyz` probes. [`app`] wraps the routes in the
//! redirect rule and the request log.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::health;
use crate::middleware::{Redirect, RequestLog};
use crate::problem::{FieldErrors, ProblemDetails};
use crate::request::{BodyError, Request};
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{SharedStore, StoreError};
use crate::todo::Todo;
use crate::validation::validate_new_todo;

/// Why a todo request was refused.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("todo not found")]
    NotFound,

    #[error("`{0}` is not a valid todo id")]
    InvalidId(String),

    #[error(transparent)]
    Body(#[from] BodyError),

    #[error("todo failed validation")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => Response::status(Status::NotFound),
            Self::InvalidId(raw) => {
                ProblemDetails::bad_request(format!("`{raw}` is not a valid todo id")).into_response()
            }
            Self::Body(e @ BodyError::UnsupportedMediaType(_)) => {
                ProblemDetails::unsupported_media_type(e.to_string()).into_response()
            }
            Self::Body(e @ BodyError::Malformed(_)) => {
                ProblemDetails::bad_request(e.to_string()).into_response()
            }
            Self::Validation(errors) => ProblemDetails::validation(errors).into_response(),
            Self::Store(e) => {
                error!("store error: {e}");
                ProblemDetails::internal(e.to_string()).into_response()
            }
        }
    }
}

/// The full application: todo routes and probes behind the redirect rule
/// and the request log.
///
/// The redirect is the outer layer, so redirected requests are answered
/// before they are logged or routed.
pub fn app(store: SharedStore, redirect: Redirect) -> Router {
    routes(store).layer(redirect).layer(RequestLog)
}

/// Route table only, without middleware.
pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .get("/todos", with_store(Arc::clone(&store), list_todos))
        .get("/todos/{id}", with_store(Arc::clone(&store), get_todo))
        .post("/todos", with_store(Arc::clone(&store), create_todo))
        .delete("/todos/{id}", with_store(Arc::clone(&store), delete_todo))
        .get("/healthz", health::liveness)
        .get("/readyz", with_store(Arc::clone(&store), health::readiness))
}

/// Adapts a `(store, request)` handler to the one-argument shape the router
/// takes, handing each call its own clone of the store handle.
fn with_store<F, Fut>(store: SharedStore, handler: F) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    F: Fn(SharedStore, Request) -> Fut + Send + Sync + 'static,
{
    move |req| handler(Arc::clone(&store), req)
}

// GET /todos
async fn list_todos(store: SharedStore, _req: Request) -> Json<Vec<Todo>> {
    Json(store.list_all())
}

// GET /todos/{id}
async fn get_todo(store: SharedStore, req: Request) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(&req)?;
    store.get_by_id(id)?.map(Json).ok_or(ApiError::NotFound)
}

// POST /todos
async fn create_todo(store: SharedStore, req: Request) -> Result<Response, ApiError> {
    let todo: Todo = req.json()?;
    validate_new_todo(&todo, Utc::now()).map_err(|errors| {
        debug!(id = todo.id, fields = ?errors.keys().collect::<Vec<_>>(), "todo rejected");
        ApiError::Validation(errors)
    })?;

    let todo = store.add(todo);
    info!(id = todo.id, "todo created");

    let location = format!("/todos/{}", todo.id);
    Ok(Json(todo).with(
        Response::builder()
            .status(Status::Created)
            .header("location", &location),
    ))
}

// DELETE /todos/{id}
async fn delete_todo(store: SharedStore, req: Request) -> Result<Status, ApiError> {
    let id = todo_id(&req)?;
    let removed = store.delete_by_id(id);
    debug!(id, removed, "todo delete");
    Ok(Status::NoContent)
}

fn todo_id(req: &Request) -> Result<i32, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_owned()))
}
