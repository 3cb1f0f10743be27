//! Request forwarding to the upstream API server.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request},
};
use reqwest::multipart::{Form, Part};

use crate::config::validation::check_upstream_timeouts;
use crate::config::UpstreamConfig;
use crate::gateway::error::{ExchangePhase, GatewayError, UpstreamError};
use crate::gateway::request::{FilePart, MultipartForm, ProxyBody, ProxyRequest};
use crate::gateway::target::UpstreamTarget;
use crate::http::response::ProxyResponse;
use crate::observability::metrics;
use crate::resilience::Deadline;

/// Forwards `/api/*` requests to a single upstream.
///
/// Cheap to clone; clones share the HTTP client and the target.
#[derive(Clone)]
pub struct Gateway {
    target: Arc<UpstreamTarget>,
    client: reqwest::Client,
    deadline: Deadline,
}

impl Gateway {
    /// Build a gateway for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> Result<Self, GatewayError> {
        let target = UpstreamTarget::parse(&config.base_url)?;
        if let Some(err) = check_upstream_timeouts(config).into_iter().next() {
            return Err(err.into());
        }

        // Connect timeout sits under the deadline so refusals surface as 503.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .no_proxy()
            .build()?;

        Ok(Self {
            target: Arc::new(target),
            client,
            deadline: Deadline::from_millis(config.request_timeout_ms),
        })
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Capture and forward an inbound request whose suffix after `/api/` is `path`.
    ///
    /// Always produces a response; rejected requests never reach the upstream.
    pub async fn handle(&self, path: &str, request: Request<Body>) -> ProxyResponse {
        let start = Instant::now();
        let method = request.method().clone();

        match ProxyRequest::from_http(path.to_owned(), request).await {
            Ok(proxy_request) => self.forward(proxy_request).await,
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Rejected inbound request");
                let response = e.to_response();
                metrics::record_request(
                    method.as_str(),
                    response.status().as_u16(),
                    "rejected",
                    start,
                );
                response
            }
        }
    }

    /// Forward a captured request and relay the result.
    pub async fn forward(&self, request: ProxyRequest) -> ProxyResponse {
        let start = Instant::now();
        let method = request.method;
        let url = self.target.url_for(&request.path, request.query.as_deref());

        tracing::debug!(method = %method, url = %url, "Forwarding request");

        let result = match self.deadline.run(self.exchange(&url, request)).await {
            Ok(result) => result,
            Err(elapsed) => Err(UpstreamError::from(elapsed)),
        };

        match result {
            Ok(response) => {
                tracing::debug!(
                    method = %method,
                    url = %url,
                    status = response.status().as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Relayed upstream response"
                );
                metrics::record_request(
                    method.as_str(),
                    response.status().as_u16(),
                    "relayed",
                    start,
                );
                response
            }
            Err(e) => {
                match &e {
                    UpstreamError::Transport(_) => {
                        tracing::error!(method = %method, url = %url, error = %e, "Upstream error")
                    }
                    _ => tracing::warn!(method = %method, url = %url, error = %e, "Upstream error"),
                }
                let response = e.to_response();
                metrics::record_request(
                    method.as_str(),
                    response.status().as_u16(),
                    e.outcome(),
                    start,
                );
                response
            }
        }
    }

    async fn exchange(
        &self,
        url: &str,
        request: ProxyRequest,
    ) -> Result<ProxyResponse, UpstreamError> {
        let deadline = self.deadline.duration();

        let mut builder = self.client.request(request.method.as_http(), url);

        builder = match request.body {
            ProxyBody::Empty => match request.content_type {
                Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                None => builder,
            },
            ProxyBody::Raw(bytes) => {
                let builder = match request.content_type {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(bytes)
            }
            // reqwest writes its own multipart content type with a fresh boundary
            ProxyBody::Multipart(form) => builder.multipart(build_form(form)),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError::classify(e, ExchangePhase::Send, deadline))?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::classify(e, ExchangePhase::Body, deadline))?;

        Ok(ProxyResponse::relay(status, content_type, body))
    }
}

fn build_form(form: MultipartForm) -> Form {
    let mut out = Form::new();
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    for file in form.files {
        let field = file.field.clone();
        out = out.part(field, file_part(file));
    }
    out
}

fn file_part(file: FilePart) -> Part {
    let part = |file: &FilePart| Part::bytes(file.data.to_vec()).file_name(file.filename.clone());

    match &file.content_type {
        Some(content_type) => part(&file).mime_str(content_type).unwrap_or_else(|e| {
            tracing::warn!(
                filename = %file.filename,
                content_type = %content_type,
                error = %e,
                "Dropping unparsable part content type"
            );
            part(&file)
        }),
        None => part(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::ValidationError;
    use crate::gateway::method::ProxyMethod;
    use axum::body::Bytes;
    use axum::http::{Method, StatusCode};

    fn gateway_for(base_url: &str, timeout_ms: u64) -> Gateway {
        Gateway::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            request_timeout_ms: timeout_ms,
            connect_timeout_ms: None,
        })
        .unwrap()
    }

    fn unused_addr() -> std::net::SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_target() {
        let result = Gateway::new(&UpstreamConfig {
            base_url: "localhost".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_new_rejects_connect_timeout_beyond_deadline() {
        let result = Gateway::new(&UpstreamConfig {
            request_timeout_ms: 5_000,
            connect_timeout_ms: Some(10_000),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(GatewayError::Config(ValidationError::ConnectTimeout { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_method_never_contacts_upstream() {
        // Nothing listens here; an upstream call would come back as 503.
        let gateway = gateway_for(&format!("http://{}", unused_addr()), 1_000);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/images")
            .body(Body::empty())
            .unwrap();

        let response = gateway.handle("images", request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.body().as_ref(),
            br#"{"error": "Method not allowed"}"#
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_503() {
        let gateway = gateway_for(&format!("http://{}", unused_addr()), 1_000);
        let response = gateway
            .forward(ProxyRequest {
                method: ProxyMethod::Get,
                path: "images".into(),
                query: None,
                content_type: None,
                body: ProxyBody::Empty,
            })
            .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.content_type(), "application/json");
        assert_eq!(
            response.body().as_ref(),
            br#"{"error": "API server unavailable"}"#
        );
    }

    #[test]
    fn test_file_part_with_bad_mime_still_builds() {
        let _part = file_part(FilePart {
            field: "f".into(),
            filename: "a.txt".into(),
            content_type: Some("not a mime".into()),
            data: Bytes::from_static(b"hello"),
        });
    }
}
