//! HTTP gateway in front of an internal API server.
//!
//! Serves the landing page and static assets, and forwards every `/api/*`
//! request to a single configured upstream, relaying its status, content type
//! and body. Transport failures become small JSON error responses.

// Core subsystems
pub mod config;
pub mod gateway;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
