//! User entity model and DTOs.

use mirage_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly.  Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub usage_images: i64,
    pub usage_audio: i64,
    pub usage_videos: i64,
    pub last_login_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Per-category usage counters as exposed to the frontend dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub images: i64,
    pub audio: i64,
    pub videos: i64,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub usage: UsageSummary,
    pub last_login_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            usage: UsageSummary {
                images: user.usage_images,
                audio: user.usage_audio,
                videos: user.usage_videos,
            },
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}
