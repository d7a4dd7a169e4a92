pub mod generation;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /image           generate image (POST, requires auth)
/// /video           generate video (POST, requires auth)
/// /users/me        own profile with usage counters (GET, requires auth)
///                  update own display name (PUT, requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .merge(user::router())
}
