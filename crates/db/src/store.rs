//! Usage recording and profile lookup behind a storage trait.
//!
//! Handlers depend on [`UserStore`] rather than on a pool directly, so
//! the HTTP surface can be exercised in tests with an in-memory fake.
//! Recording usage is invoked only after a confirmed success and is
//! fire-and-forget relative to the response: callers log failures and
//! move on.

use async_trait::async_trait;
use mirage_core::types::DbId;
use mirage_core::usage::UsageCategory;

use crate::models::user::User;
use crate::repositories::UserRepo;
use crate::DbPool;

/// Errors from the user storage layer.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User {0} not found")]
    NotFound(DbId),
}

/// Persistence operations the generation handlers need.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Atomically increment the user's counter for `category` and
    /// refresh `last_login_at`.
    async fn record_usage(
        &self,
        user_id: DbId,
        category: UsageCategory,
    ) -> Result<(), UserStoreError>;

    /// Fetch a user's profile row.
    async fn find_user(&self, user_id: DbId) -> Result<Option<User>, UserStoreError>;

    /// Update a user's display name, returning the updated row, or `None`
    /// if the user does not exist.
    async fn update_name(&self, user_id: DbId, name: &str)
        -> Result<Option<User>, UserStoreError>;
}

/// Postgres-backed [`UserStore`].
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn record_usage(
        &self,
        user_id: DbId,
        category: UsageCategory,
    ) -> Result<(), UserStoreError> {
        let updated = UserRepo::record_usage(&self.pool, user_id, category).await?;
        if !updated {
            return Err(UserStoreError::NotFound(user_id));
        }
        tracing::debug!(user_id, column = category.column(), "Recorded usage");
        Ok(())
    }

    async fn find_user(&self, user_id: DbId) -> Result<Option<User>, UserStoreError> {
        Ok(UserRepo::find_by_id(&self.pool, user_id).await?)
    }

    async fn update_name(
        &self,
        user_id: DbId,
        name: &str,
    ) -> Result<Option<User>, UserStoreError> {
        Ok(UserRepo::update_name(&self.pool, user_id, name).await?)
    }
}
