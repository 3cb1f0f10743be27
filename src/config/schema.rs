//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Internal API server the gateway forwards to.
    pub upstream: UpstreamConfig,

    /// Landing page and static assets.
    pub web: WebConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8001".to_string(),
        }
    }
}

/// Upstream API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the API server (scheme, host and port only).
    pub base_url: String,

    /// Deadline for a whole upstream exchange in milliseconds.
    pub request_timeout_ms: u64,

    /// Connection establishment timeout in milliseconds. Must stay below
    /// `request_timeout_ms`; when unset it is derived from it.
    pub connect_timeout_ms: Option<u64>,
}

impl UpstreamConfig {
    /// Upper bound for a derived connect timeout.
    pub const MAX_DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

    /// Effective connect timeout.
    ///
    /// Unset means half the request deadline, capped at ten seconds, so a
    /// connect failure is reported before the deadline fires.
    pub fn connect_timeout(&self) -> Duration {
        let ms = self.connect_timeout_ms.unwrap_or_else(|| {
            (self.request_timeout_ms / 2).clamp(1, Self::MAX_DEFAULT_CONNECT_TIMEOUT_MS)
        });
        Duration::from_millis(ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 120_000,
            connect_timeout_ms: None,
        }
    }
}

/// Static web content served next to the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Directory served under `/static`.
    pub static_dir: String,

    /// File served at `/`.
    pub index_file: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_string(),
            index_file: "templates/index.html".to_string(),
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
