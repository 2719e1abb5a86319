//! Repository implementations for database access
//!
//! Repositories borrow the pool, issue bound-parameter SQL only, and
//! translate constraint violations into typed errors.

pub mod users;

pub use users::{DbError, UserRepo};
