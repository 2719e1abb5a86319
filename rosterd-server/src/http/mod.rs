//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - Per-request deadlines on every database touch
//! - Graceful shutdown, then pool release
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server};
