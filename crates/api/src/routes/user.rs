//! Route definitions for the authenticated user's profile.
//!
//! ```text
//! GET /users/me     me
//! PUT /users/me     update_me
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/users/me", get(user::me).put(user::update_me))
}
