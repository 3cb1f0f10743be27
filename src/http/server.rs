//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit, request ID)
//! - Bind server to listener
//! - Dispatch `/api/*` requests to the gateway
//! - Serve the landing page and static assets

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::{Gateway, GatewayError};
use crate::http::request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
use crate::http::static_files::web_routes;
use crate::lifecycle::shutdown_signal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = Gateway::new(&config.upstream)?;

        tracing::info!(
            upstream = %gateway.target(),
            request_timeout_ms = config.upstream.request_timeout_ms,
            "Gateway initialized"
        );

        let router = Self::build_router(&config, AppState { gateway });
        Ok(Self {
            router,
            config: Arc::new(config),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/{*path}", any(proxy_handler))
            .merge(web_routes(&config.web))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request.request_id(),
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown channel fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// `/api/*` handler: everything after the prefix is forwarded undecoded.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = api_suffix(request.uri().path()).to_owned();

    tracing::debug!(
        request_id = %request.request_id(),
        method = %request.method(),
        path = %path,
        "Proxying request"
    );

    state.gateway.handle(&path, request).await.into_response()
}

fn api_suffix(path: &str) -> &str {
    path.strip_prefix("/api/").unwrap_or(path)
}
