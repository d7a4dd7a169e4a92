//! Handlers for the authenticated user's own profile.

use axum::extract::State;
use axum::Json;
use mirage_core::error::CoreError;
use mirage_db::models::user::UserResponse;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /users/me`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name. Validated (trimmed, non-empty).
    #[serde(default)]
    pub name: String,
}

/// GET /api/v1/users/me
///
/// Returns the authenticated user's profile, including usage counters.
/// The password hash never leaves the storage layer.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let found = state
        .users
        .find_user(user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(UserResponse::from(found)))
}

/// PUT /api/v1/users/me
///
/// Updates the authenticated user's display name and returns the
/// refreshed profile.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".to_string(),
        )));
    }

    let updated = state
        .users
        .update_name(user.user_id, name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    tracing::info!(user_id = user.user_id, "User profile updated");
    Ok(Json(UserResponse::from(updated)))
}
