//! Inbound request capture.
//!
//! # Responsibilities
//! - Reject methods outside the forwarded set before anything is read
//! - Keep path suffix, query string and `Content-Type` byte-for-byte
//! - Refuse suffixes with dot segments, which URL normalization would
//!   resolve outside `/api/`
//! - Fully buffer the body (raw bytes or multipart parts) before forwarding

use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
        FromRequest, Multipart,
    },
    http::{header::CONTENT_TYPE, HeaderValue, Method, Request, StatusCode},
};
use thiserror::Error;

use crate::gateway::method::ProxyMethod;
use crate::http::response::ProxyResponse;

/// One uploaded file from a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name. Several files may share one name.
    pub field: String,
    pub filename: String,
    /// Declared content type of the part, if the client sent one.
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A buffered multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub files: Vec<FilePart>,
    /// Plain (non-file) fields in arrival order.
    pub fields: Vec<(String, String)>,
}

/// Body to send upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyBody {
    Empty,
    Raw(Bytes),
    Multipart(MultipartForm),
}

/// A fully captured inbound request, ready to forward.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: ProxyMethod,
    /// Everything after `/api/`, undecoded.
    pub path: String,
    /// Raw query string; `None` when absent or empty.
    pub query: Option<String>,
    pub content_type: Option<HeaderValue>,
    pub body: ProxyBody,
}

/// Reasons an inbound request never reaches the upstream.
#[derive(Debug, Error)]
pub enum InboundError {
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),

    #[error("path '{0}' contains a dot segment")]
    DotSegment(String),

    #[error("failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("invalid multipart request: {0}")]
    MultipartRejected(#[from] MultipartRejection),

    #[error("invalid multipart field: {0}")]
    Multipart(#[from] MultipartError),
}

impl InboundError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::DotSegment(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::MultipartRejected(rejection) => rejection.status(),
            Self::Multipart(err) => err.status(),
        }
    }

    /// Caller-facing message; rejection details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "Method not allowed",
            Self::DotSegment(_) => "Invalid path",
            Self::Body(_) => "Invalid request body",
            Self::MultipartRejected(_) | Self::Multipart(_) => "Invalid multipart body",
        }
    }

    pub fn to_response(&self) -> ProxyResponse {
        ProxyResponse::error(self.status(), self.public_message())
    }
}

impl ProxyRequest {
    /// Capture an inbound request whose path suffix (after `/api/`) is `path`.
    pub async fn from_http(path: String, request: Request<Body>) -> Result<Self, InboundError> {
        let method = ProxyMethod::from_http(request.method())
            .ok_or_else(|| InboundError::MethodNotAllowed(request.method().clone()))?;

        if has_dot_segment(&path) {
            return Err(InboundError::DotSegment(path));
        }

        let query = request
            .uri()
            .query()
            .filter(|q| !q.is_empty())
            .map(str::to_owned);
        let content_type = request.headers().get(CONTENT_TYPE).cloned();

        let body = match method {
            ProxyMethod::Get | ProxyMethod::Delete => ProxyBody::Empty,
            ProxyMethod::Post if is_multipart(content_type.as_ref()) => {
                ProxyBody::Multipart(read_multipart(request).await?)
            }
            ProxyMethod::Post | ProxyMethod::Put | ProxyMethod::Patch => {
                ProxyBody::Raw(Bytes::from_request(request, &()).await?)
            }
        };

        Ok(Self {
            method,
            path,
            query,
            content_type,
            body,
        })
    }
}

/// True if any segment is `.` or `..`, literally or percent-encoded.
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

fn is_multipart(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart(request: Request<Body>) -> Result<MultipartForm, InboundError> {
    let mut multipart = Multipart::from_request(request, &()).await?;
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_owned) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await?;
                form.files.push(FilePart {
                    field: name,
                    filename,
                    content_type,
                    data,
                });
            }
            None => {
                let value = field.bytes().await?;
                form.fields
                    .push((name, String::from_utf8_lossy(&value).into_owned()));
            }
        }
    }

    Ok(form)
}
