//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce the request deadline)
//!     → On failure: gateway::error classifies and synthesizes a response
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: each inbound request maps to exactly one upstream call

pub mod timeouts;

pub use timeouts::{Deadline, DeadlineExceeded};
