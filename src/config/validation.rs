//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream base URL shape
//! - Validate value ranges (timeouts > 0, connect below request deadline, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, UpstreamConfig};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url '{url}' is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(
        "upstream.connect_timeout_ms ({connect}) must be less than upstream.request_timeout_ms ({request})"
    )]
    ConnectTimeout { connect: u64, request: u64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    errors.extend(check_upstream_timeouts(&config.upstream));
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The deadline must be positive and an explicit connect timeout must fit inside it.
pub(crate) fn check_upstream_timeouts(upstream: &UpstreamConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if upstream.request_timeout_ms == 0 {
        errors.push(ValidationError::Zero("upstream.request_timeout_ms"));
    }
    match upstream.connect_timeout_ms {
        Some(0) => errors.push(ValidationError::Zero("upstream.connect_timeout_ms")),
        Some(connect) if upstream.request_timeout_ms > 0 && connect >= upstream.request_timeout_ms => {
            errors.push(ValidationError::ConnectTimeout {
                connect,
                request: upstream.request_timeout_ms,
            });
        }
        _ => {}
    }

    errors
}

/// The base URL must be absolute http(s) with a host and nothing after the authority.
pub(crate) fn check_upstream_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    if url.path() != "/" {
        return Err("path is not allowed, the gateway appends /api/ itself".to_string());
    }

    Ok(url)
}
