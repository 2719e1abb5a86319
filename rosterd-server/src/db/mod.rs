//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Connection pool passed by reference - no global handle
//! - Migrations are plain .sql files applied in filename order, one
//!   transaction per file, tracked in `schema_migrations`
//! - Repositories rely on DB constraints and map violations to typed errors

pub mod migrate;
pub mod pool;
pub mod repos;

pub use migrate::{apply_all, MigrateError};
pub use pool::{create_pool, ping};
pub use repos::{DbError, UserRepo};
