//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use serde::de::DeserializeOwned;

/// Why a request body could not be turned into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// The `content-type` header is missing or is not a JSON media type.
    #[error("expected content-type application/json, got `{0}`")]
    UnsupportedMediaType(String),

    /// The body is not valid JSON for the requested type.
    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: http::Method,
    pub(crate) uri: http::Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from an already-buffered `http::Request`.
    ///
    /// The server does this after collecting the body; tests use it to drive
    /// a [`Router`](crate::Router) without a socket.
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/todos/{id}`, `req.param("id")` on `/todos/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    ///
    /// The `content-type` must be `application/json` or a `+json` suffix
    /// type; parameters such as `charset` are ignored.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        let content_type = self.header("content-type").unwrap_or_default();
        if !is_json(content_type) {
            return Err(BodyError::UnsupportedMediaType(content_type.to_owned()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
