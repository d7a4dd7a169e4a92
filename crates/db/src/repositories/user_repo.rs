//! Repository for the `users` table.

use mirage_core::types::DbId;
use mirage_core::usage::UsageCategory;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, \
                       usage_images, usage_audio, usage_videos, \
                       last_login_at, created_at, updated_at";

/// Provides read and usage-accounting operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Add one completed operation to the user's counter for `category`
    /// and refresh `last_login_at`.
    ///
    /// The increment happens in place inside a single UPDATE, never as a
    /// read-modify-write, so concurrent requests from the same user
    /// cannot lose counts.  Returns `false` if no row matched the id.
    pub async fn record_usage(
        pool: &PgPool,
        id: DbId,
        category: UsageCategory,
    ) -> Result<bool, sqlx::Error> {
        // `column()` is a closed enum mapping, not caller input.
        let column = category.column();
        let query = format!(
            "UPDATE users
             SET {column} = {column} + 1, last_login_at = NOW(), updated_at = NOW()
             WHERE id = $1"
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the user's display name, returning the updated row.
    ///
    /// Returns `None` if no row matched the id.
    pub async fn update_name(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Refresh `last_login_at` without touching any counter.
    pub async fn touch_last_login(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
