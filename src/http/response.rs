//! Response handling.
//!
//! # Responsibilities
//! - Carry the upstream status, content type and body back to the client untouched
//! - Build the small JSON error bodies the gateway synthesizes itself
//!
//! # Design Decisions
//! - Bodies are buffered; the upstream body is never inspected or rewritten
//! - Only `Content-Type` is relayed from upstream headers
//! - Missing upstream content type falls back to `application/json`

use axum::{
    body::{Body, Bytes},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type used for synthesized errors and when upstream omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// What the gateway sends back for one inbound request.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    status: StatusCode,
    content_type: HeaderValue,
    body: Bytes,
}

impl ProxyResponse {
    /// Relay a completed upstream response.
    pub fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        Self {
            status,
            content_type: content_type
                .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
            body,
        }
    }

    /// Synthesize `{"error": "<message>"}`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = format!("{{\"error\": {}}}", serde_json::Value::from(message));
        Self {
            status,
            content_type: HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
            body: Bytes::from(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        response.headers_mut().insert(CONTENT_TYPE, self.content_type);
        response
    }
}
