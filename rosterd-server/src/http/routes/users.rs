//! User endpoints

use std::time::Duration;

use axum::http::StatusCode;
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tokio::time::timeout;

use crate::db::UserRepo;
use crate::http::error::ApiError;
use crate::models::{User, UserDraft};
use crate::state::AppState;

/// Deadline for user queries.
const QUERY_DEADLINE: Duration = Duration::from_secs(10);

/// Create user request. Missing fields default to empty strings so that
/// validation reports 400 rather than a serde rejection.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// GET /users - all users in ascending id order
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = timeout(QUERY_DEADLINE, UserRepo::new(state.pool()).list())
        .await
        .map_err(|_| ApiError::Timeout {
            seconds: QUERY_DEADLINE.as_secs(),
        })??;

    Ok(Json(users))
}

/// POST /users - create a user
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let draft = UserDraft::new(&req.username, &req.email)?;

    let user = timeout(QUERY_DEADLINE, UserRepo::new(state.pool()).create(&draft))
        .await
        .map_err(|_| ApiError::Timeout {
            seconds: QUERY_DEADLINE.as_secs(),
        })??;

    tracing::info!(id = user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let req: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_empty());
        assert!(req.email.is_empty());
    }
}
