//! API gateway core.
//!
//! # Data Flow
//! ```text
//! /api/<path>?<query> (inbound)
//!     → request.rs (method and path checks, buffer body or multipart parts)
//!     → target.rs (<base>/api/<path>?<query>)
//!     → forward.rs (one upstream call under the deadline)
//!     → relay status / body / content type
//!       or error.rs (503 unavailable, 504 timeout, 502 other)
//! ```
//!
//! # Design Decisions
//! - Only `Content-Type` travels upstream
//! - Upstream responses are relayed whatever their status
//! - No retries and no state shared between requests besides the client

pub mod error;
pub mod forward;
pub mod method;
pub mod request;
pub mod target;

pub use error::{ExchangePhase, GatewayError, UpstreamError};
pub use forward::Gateway;
pub use method::ProxyMethod;
pub use request::{FilePart, InboundError, MultipartForm, ProxyBody, ProxyRequest};
pub use target::UpstreamTarget;
