//! The fixed upstream the gateway forwards to.

use std::fmt;

use crate::config::validation::{check_upstream_url, ValidationError};

/// Base URL of the internal API server.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    base: String,
}

impl UpstreamTarget {
    /// Validate and normalize a base URL such as `http://localhost:8080`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        check_upstream_url(raw).map_err(|reason| ValidationError::UpstreamUrl {
            url: raw.to_string(),
            reason,
        })?;

        Ok(Self {
            base: raw.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build `<base>/api/<path>[?<query>]`.
    ///
    /// Path and query are copied as-is; nothing is decoded or re-encoded.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}/api/{}?{}", self.base, path, query),
            _ => format!("{}/api/{}", self.base, path),
        }
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
