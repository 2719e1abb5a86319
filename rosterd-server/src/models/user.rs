//! User record and validated create payload

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 64;

/// Maximum length for email addresses (RFC 5321 limit)
const MAX_EMAIL_LEN: usize = 254;

/// Username pattern: starts with alphanumeric, allows dots/hyphens/underscores.
/// Case is preserved as given.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$").expect("invalid username regex")
});

/// Structural email check only: something@domain.tld. Real validation
/// happens when mail is sent, not here.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// A stored user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    username: String,
    email: String,
}

impl UserDraft {
    /// Validate a username/email pair.
    ///
    /// # Rules
    /// - username: non-empty, max 64 chars, alphanumeric with
    ///   dots/hyphens/underscores, starting with alphanumeric
    /// - email: non-empty, max 254 chars, `local@domain.tld` shape
    pub fn new(username: &str, email: &str) -> Result<Self, ValidationError> {
        if username.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if username.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }
        if !USERNAME_RE.is_match(username) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must be alphanumeric with dots/hyphens/underscores, starting with alphanumeric",
            });
        }

        if email.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if email.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !EMAIL_RE.is_match(email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like local@domain.tld",
            });
        }

        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft() {
        let draft = UserDraft::new("alice", "alice@example.com").expect("valid");
        assert_eq!(draft.username(), "alice");
        assert_eq!(draft.email(), "alice@example.com");
    }

    #[test]
    fn empty_fields_rejected() {
        assert!(matches!(
            UserDraft::new("", "alice@example.com"),
            Err(ValidationError::Empty { field: "username" })
        ));
        assert!(matches!(
            UserDraft::new("alice", ""),
            Err(ValidationError::Empty { field: "email" })
        ));
    }

    #[test]
    fn mixed_case_username_accepted() {
        // Case is the caller's choice, not a rejection reason.
        let draft = UserDraft::new("Alice", "alice@example.com").expect("valid");
        assert_eq!(draft.username(), "Alice");
    }

    #[test]
    fn bad_username_shapes_rejected() {
        assert!(UserDraft::new("-alice", "a@b.co").is_err()); // leading dash
        assert!(UserDraft::new("al ice", "a@b.co").is_err()); // whitespace
        assert!(UserDraft::new(&"a".repeat(65), "a@b.co").is_err()); // too long
    }

    #[test]
    fn bad_email_shapes_rejected() {
        assert!(UserDraft::new("alice", "not-an-email").is_err());
        assert!(UserDraft::new("alice", "a@b").is_err()); // no tld
        assert!(UserDraft::new("alice", "a b@c.dk").is_err()); // whitespace
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            UserDraft::new("alice", &long),
            Err(ValidationError::TooLong { field: "email", .. })
        ));
    }
}
