//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values that take precedence over the config file.
///
/// Populated from command-line flags and `GATEWAY_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub upstream_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

impl GatewayConfig {
    /// Apply overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bind_address) = overrides.bind_address {
            self.listener.bind_address = bind_address;
        }
        if let Some(upstream_url) = overrides.upstream_url {
            self.upstream.base_url = upstream_url;
        }
        if let Some(timeout_ms) = overrides.request_timeout_ms {
            self.upstream.request_timeout_ms = timeout_ms;
        }
        if let Some(connect_ms) = overrides.connect_timeout_ms {
            self.upstream.connect_timeout_ms = Some(connect_ms);
        }
        self
    }
}

/// Parse configuration from a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: defaults, then the optional file, then overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<GatewayConfig, ConfigError> {
    let base = match path {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };

    let config = base.with_overrides(overrides);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
