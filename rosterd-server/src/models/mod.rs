//! Domain models and input validation

pub mod user;
pub mod validation;

pub use user::{User, UserDraft};
pub use validation::ValidationError;
