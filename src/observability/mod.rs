//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP layer produce:
//!     → logging.rs (structured log events, request-scoped spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout log
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
