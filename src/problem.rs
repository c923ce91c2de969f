//! RFC 9457 problem-details bodies.
//!
//! Every non-2xx answer that carries a body uses this shape, served as
//! `application/problem+json`. Validation failures add an `errors` map of
//! field name to messages.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::response::{ContentType, IntoResponse, Response};
use crate::status::Status;

/// Field name → every message raised for that field.
///
/// Ordered so the wire output is stable.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const BAD_REQUEST_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.1";
const CONTENT_TOO_LARGE_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.14";
const UNSUPPORTED_MEDIA_TYPE_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.16";
const INTERNAL_ERROR_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.6.1";

#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl ProblemDetails {
    /// `400` listing every failed field.
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            kind: BAD_REQUEST_TYPE,
            title: "One or more validation errors occurred.".to_owned(),
            status: Status::BadRequest.into(),
            detail: None,
            errors,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            kind: BAD_REQUEST_TYPE,
            title: "Bad Request".to_owned(),
            status: Status::BadRequest.into(),
            detail: Some(detail.into()),
            errors: FieldErrors::new(),
        }
    }

    /// `413` for a request body over the server's limit of `limit` bytes.
    pub fn content_too_large(limit: usize) -> Self {
        Self {
            kind: CONTENT_TOO_LARGE_TYPE,
            title: "Content Too Large".to_owned(),
            status: Status::ContentTooLarge.into(),
            detail: Some(format!("request body exceeds {limit} bytes")),
            errors: FieldErrors::new(),
        }
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self {
            kind: UNSUPPORTED_MEDIA_TYPE_TYPE,
            title: "Unsupported Media Type".to_owned(),
            status: Status::UnsupportedMediaType.into(),
            detail: Some(detail.into()),
            errors: FieldErrors::new(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            kind: INTERNAL_ERROR_TYPE,
            title: "An error occurred while processing your request.".to_owned(),
            status: Status::InternalServerError.into(),
            detail: Some(detail.into()),
            errors: FieldErrors::new(),
        }
    }

    fn status_code(&self) -> Status {
        match self.status {
            400 => Status::BadRequest,
            413 => Status::ContentTooLarge,
            415 => Status::UnsupportedMediaType,
            _ => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match serde_json::to_vec(&self) {
            Ok(bytes) => Response::builder().status(status).bytes(ContentType::ProblemJson, bytes),
            Err(_) => Response::status(status),
        }
    }
}
