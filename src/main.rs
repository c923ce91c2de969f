//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:3000/todos
//!   curl -X POST http://localhost:3000/todos \
//!        -H 'content-type: application/json' \
//!        -d '{"id":1,"name":"A","dueDate":"2030-01-01T00:00:00Z","isCompleted":false}'
//!   curl -i http://localhost:3000/tasks/1
//!   curl -X DELETE http://localhost:3000/todos/1

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tsu_todos::{Config, InMemoryTaskStore, Server, api};

#[tokio::main]
async fn main() -> Result<(), tsu_todos::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let app = api::app(InMemoryTaskStore::shared(), config.redirect());

    Server::bind(&config.addr)?
        .body_limit(config.max_body_bytes)
        .serve(app)
        .await
}
