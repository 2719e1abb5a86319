//! rosterd-server: Postgres-backed user roster over HTTP
//!
//! Startup order is fixed: create the connection pool, run the SQL file
//! migrations, then serve requests. The HTTP layer never touches a schema
//! the migration runner has not brought up to date.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use config::ServerConfig;
pub use http::{build_router, run_server, ApiError};
pub use state::AppState;
