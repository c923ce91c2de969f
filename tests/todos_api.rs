use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Value, json};
use tsu_todos::middleware::Redirect;
use tsu_todos::{InMemoryTaskStore, Request, Response, Router, SharedStore, Status, TaskStore, api};

struct TestApp {
    router: Arc<Router>,
    store: SharedStore,
}

impl TestApp {
    fn new() -> Self {
        let store = InMemoryTaskStore::shared();
        let router = Arc::new(api::app(Arc::clone(&store), Redirect::found("/tasks/", "/todos/")));
        Self { router, store }
    }

    async fn send(&self, method: http::Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Bytes::from(serde_json::to_vec(&value).unwrap())
            }
            None => Bytes::new(),
        };
        self.router.handle(Request::from_http(builder.body(body).unwrap())).await
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(http::Method::GET, uri, None).await
    }

    async fn post(&self, body: Value) -> Response {
        self.send(http::Method::POST, "/todos", Some(body)).await
    }

    async fn delete(&self, uri: &str) -> Response {
        self.send(http::Method::DELETE, uri, None).await
    }
}

fn rfc3339(offset: Duration) -> String {
    (Utc::now() + offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn todo(id: i32, name: &str, due_offset: Duration, is_completed: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "dueDate": rfc3339(due_offset),
        "isCompleted": is_completed,
    })
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

#[tokio::test]
async fn create_get_delete_lifecycle() {
    let app = TestApp::new();
    let new = todo(1, "A", Duration::days(1), false);

    let res = app.post(new.clone()).await;
    assert_eq!(res.status_code(), Status::Created);
    assert_eq!(res.header("location"), Some("/todos/1"));
    assert_eq!(json_body(&res), new);
    assert_eq!(app.store.len(), 1);

    let res = app.get("/todos/1").await;
    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(json_body(&res), new);

    let res = app.delete("/todos/1").await;
    assert_eq!(res.status_code(), Status::NoContent);
    assert!(res.body().is_empty());

    let res = app.get("/todos/1").await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn list_is_empty_array_then_insertion_ordered() {
    let app = TestApp::new();

    let res = app.get("/todos").await;
    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(json_body(&res), json!([]));

    for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
        app.post(todo(id, name, Duration::hours(1), false)).await;
    }

    let names: Vec<String> = json_body(&app.get("/todos").await)
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[tokio::test]
async fn past_due_date_is_rejected_with_only_that_field() {
    let app = TestApp::new();

    let res = app.post(todo(1, "A", -Duration::days(1), false)).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert_eq!(res.header("content-type"), Some("application/problem+json"));

    let body = json_body(&res);
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"], json!({ "DueDate": ["cannot have due date in the past"] }));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn completed_todo_is_rejected() {
    let app = TestApp::new();

    let res = app.post(todo(1, "A", Duration::days(1), true)).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert_eq!(
        json_body(&res)["errors"],
        json!({ "IsCompleted": ["cannot add completed todo"] }),
    );
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn both_violations_are_reported_together() {
    let app = TestApp::new();

    let res = app.post(todo(1, "A", -Duration::days(2), true)).await;
    assert_eq!(res.status_code(), Status::BadRequest);

    let errors = json_body(&res)["errors"].clone();
    assert_eq!(errors["DueDate"], json!(["cannot have due date in the past"]));
    assert_eq!(errors["IsCompleted"], json!(["cannot add completed todo"]));
    assert_eq!(app.store.len(), 0);
}

#[tokio::test]
async fn delete_removes_every_todo_with_the_id() {
    let app = TestApp::new();
    app.post(todo(5, "first", Duration::days(1), false)).await;
    app.post(todo(6, "other", Duration::days(1), false)).await;
    app.post(todo(5, "second", Duration::days(1), false)).await;

    let res = app.delete("/todos/5").await;
    assert_eq!(res.status_code(), Status::NoContent);

    let list = json_body(&app.get("/todos").await);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], 6);
}

#[tokio::test]
async fn delete_of_absent_id_is_silent() {
    let app = TestApp::new();
    app.post(todo(1, "A", Duration::days(1), false)).await;

    let res = app.delete("/todos/99").await;
    assert_eq!(res.status_code(), Status::NoContent);
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn duplicate_ids_make_lookup_fail_loudly() {
    let app = TestApp::new();
    app.post(todo(2, "x", Duration::days(1), false)).await;
    app.post(todo(2, "y", Duration::days(1), false)).await;

    let res = app.get("/todos/2").await;
    assert_eq!(res.status_code(), Status::InternalServerError);
    assert_eq!(json_body(&res)["status"], 500);
}

#[tokio::test]
async fn non_integer_id_is_a_bad_request() {
    let app = TestApp::new();

    assert_eq!(app.get("/todos/abc").await.status_code(), Status::BadRequest);
    assert_eq!(app.delete("/todos/1.5").await.status_code(), Status::BadRequest);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = TestApp::new();
    let req = http::Request::post("/todos")
        .header("content-type", "application/json")
        .body(Bytes::from_static(b"{\"id\": 1"))
        .unwrap();

    let res = app.router.handle(Request::from_http(req)).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn non_json_body_is_unsupported() {
    let app = TestApp::new();
    let req = http::Request::post("/todos")
        .header("content-type", "text/plain")
        .body(Bytes::from_static(b"hello"))
        .unwrap();

    let res = app.router.handle(Request::from_http(req)).await;
    assert_eq!(res.status_code(), Status::UnsupportedMediaType);
}

#[tokio::test]
async fn tasks_prefix_redirects_to_todos() {
    let app = TestApp::new();

    let res = app.get("/tasks/5?verbose=1").await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some("/todos/5?verbose=1"));

    let res = app.delete("/tasks/5").await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some("/todos/5"));
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let app = TestApp::new();

    let res = app.send(http::Method::PUT, "/todos/1", None).await;
    assert_eq!(res.status_code(), Status::MethodNotAllowed);
    assert_eq!(res.header("allow"), Some("DELETE, GET"));
}

#[tokio::test]
async fn probes_report_store_size() {
    let app = TestApp::new();
    app.post(todo(1, "A", Duration::days(1), false)).await;

    let res = app.get("/healthz").await;
    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(res.body(), b"ok");

    let res = app.get("/readyz").await;
    assert_eq!(json_body(&res), json!({ "status": "ready", "todos": 1 }));
}
