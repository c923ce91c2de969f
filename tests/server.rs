use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tsu_todos::middleware::Redirect;
use tsu_todos::{DEFAULT_BODY_LIMIT, Error, InMemoryTaskStore, api, serve_with_shutdown};

async fn start() -> (SocketAddr, oneshot::Sender<()>, JoinHandle<Result<(), Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::app(InMemoryTaskStore::shared(), Redirect::found("/tasks/", "/todos/"));
    let (tx, rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve_with_shutdown(listener, app, async {
        let _ = rx.await;
    }));
    (addr, tx, server)
}

/// Sends one HTTP/1.1 request with `connection: close` and returns the raw
/// response text.
async fn roundtrip(addr: SocketAddr, head: &str, body: &str) -> String {
    send_raw(
        addr,
        &format!(
            "{head}\r\nhost: localhost\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{body}",
            body.len(),
        ),
    )
    .await
}

async fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8(raw).unwrap()
}

#[tokio::test]
async fn serves_todos_over_tcp_and_shuts_down() {
    let (addr, shutdown, server) = start().await;

    let body = r#"{"id":1,"name":"A","dueDate":"2999-01-01T00:00:00Z","isCompleted":false}"#;
    let res = roundtrip(
        addr,
        "POST /todos HTTP/1.1\r\ncontent-type: application/json",
        body,
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 201"), "{res}");
    assert!(res.to_ascii_lowercase().contains("location: /todos/1"), "{res}");

    let res = roundtrip(addr, "GET /todos/1 HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.contains(r#""name":"A""#), "{res}");

    let res = roundtrip(addr, "GET /tasks/1 HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 302"), "{res}");

    let res = roundtrip(addr, "DELETE /todos/1 HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 204"), "{res}");

    let res = roundtrip(addr, "GET /todos/1 HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 404"), "{res}");

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn body_over_limit_is_refused_before_buffering() {
    let (addr, shutdown, server) = start().await;

    // Only the head is sent: the declared length alone is enough to refuse.
    let res = send_raw(
        addr,
        &format!(
            "POST /todos HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\
             content-type: application/json\r\ncontent-length: {}\r\n\r\n",
            DEFAULT_BODY_LIMIT + 1,
        ),
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 413"), "{res}");
    assert!(res.contains("application/problem+json"), "{res}");
    assert!(res.contains(&format!("request body exceeds {DEFAULT_BODY_LIMIT} bytes")), "{res}");

    let res = roundtrip(addr, "GET /todos HTTP/1.1", "").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.ends_with("[]"), "{res}");

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn body_at_limit_reaches_the_handler() {
    let (addr, shutdown, server) = start().await;

    let prefix = r#"{"id":1,"name":""#;
    let suffix = r#"","dueDate":"2999-01-01T00:00:00Z","isCompleted":false}"#;
    let name = "n".repeat(DEFAULT_BODY_LIMIT - prefix.len() - suffix.len());
    let body = format!("{prefix}{name}{suffix}");
    assert_eq!(body.len(), DEFAULT_BODY_LIMIT);

    let res = roundtrip(
        addr,
        "POST /todos HTTP/1.1\r\ncontent-type: application/json",
        &body,
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 201"), "{}", &res[..res.len().min(200)]);

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}
