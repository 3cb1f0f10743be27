//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → /api/*   → gateway (forward upstream)
//!       / and /static/* → static_files.rs
//!     → response.rs (status, content type, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::HttpServer;
