//! Route definitions for the generation endpoints.
//!
//! Mounted at the `/api/v1` root.
//!
//! ```text
//! POST /image     generate_image
//! POST /video     generate_video
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(generation::generate_image))
        .route("/video", post(generation::generate_video))
}
