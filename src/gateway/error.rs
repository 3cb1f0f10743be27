//! Gateway error types.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::http::response::ProxyResponse;
use crate::resilience::timeouts::DeadlineExceeded;

/// Errors raised while assembling a gateway at startup.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid upstream settings: {0}")]
    Config(#[from] ValidationError),

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where in an exchange a client error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    /// Connecting, writing the request, or waiting for the response head.
    Send,
    /// Reading the response body after the head arrived.
    Body,
}

/// Transport-level failure while talking to the upstream.
///
/// Any completed exchange is relayed as-is, whatever its status, so this only
/// covers calls that never produced a full response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No response head arrived: refused, DNS, connect timeout, or the
    /// connection was closed, reset or answered with something that is not HTTP.
    #[error("upstream unreachable: {0}")]
    Unavailable(reqwest::Error),

    /// The exchange did not finish within the deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Anything else: a body cut short, request build failures.
    #[error("upstream transport error: {0}")]
    Transport(reqwest::Error),
}

impl UpstreamError {
    /// Sort a client error into a failure kind.
    ///
    /// Connect errors win over timeouts, so a connect timeout reads as unavailable.
    /// Any other send-phase failure means the upstream never answered.
    pub fn classify(err: reqwest::Error, phase: ExchangePhase, deadline: Duration) -> Self {
        if err.is_connect() {
            Self::Unavailable(err)
        } else if err.is_timeout() {
            Self::Timeout(deadline)
        } else if phase == ExchangePhase::Send && !err.is_builder() && !err.is_redirect() {
            Self::Unavailable(err)
        } else {
            Self::Transport(err)
        }
    }

    /// Metric/log label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "API server unavailable",
            Self::Timeout(_) => "API request timeout",
            Self::Transport(_) => "API request failed",
        }
    }

    pub fn to_response(&self) -> ProxyResponse {
        ProxyResponse::error(self.status(), self.public_message())
    }
}

impl From<DeadlineExceeded> for UpstreamError {
    fn from(err: DeadlineExceeded) -> Self {
        Self::Timeout(err.0)
    }
}
