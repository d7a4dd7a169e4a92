//! Handlers for the image and video generation endpoints.
//!
//! Routes:
//! - `POST /image` -- generate a single image from a text prompt
//! - `POST /video` -- generate a short video (image stage, then motion stage)
//!
//! Both handlers hold the request open while the provider renders. A usage
//! counter is bumped only after a confirmed success, and a failure to bump
//! it never fails the response the artifact already earned.

use axum::extract::State;
use axum::Json;
use mirage_core::types::DbId;
use mirage_core::usage::UsageCategory;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Request body shared by both generation endpoints.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Text prompt. Validated (trimmed, non-empty) before any provider call.
    #[serde(default)]
    pub prompt: String,
}

/// Response for `POST /image`.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    /// URL of the generated image.
    pub image: String,
}

/// Response for `POST /video`.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub success: bool,
    /// URL of the generated video.
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

/// POST /api/v1/image
///
/// Validates the prompt, submits an image prediction, and polls until the
/// provider reports a terminal status or the attempt ceiling is reached.
pub async fn generate_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<ImageResponse>> {
    let cancel = state.shutdown.child_token();

    let image = mirage_pipeline::generate_image(
        state.predictions.as_ref(),
        &state.models,
        &input.prompt,
        &cancel,
    )
    .await?;

    record_usage(&state, user.user_id, UsageCategory::Images).await;

    Ok(Json(ImageResponse { image }))
}

/// POST /api/v1/video
///
/// Runs the two-stage pipeline: a still frame is generated from the prompt,
/// then animated. The motion stage is never submitted unless the image stage
/// produced an artifact.
pub async fn generate_video(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<VideoResponse>> {
    let cancel = state.shutdown.child_token();

    let video_url = mirage_pipeline::generate_video(
        state.predictions.as_ref(),
        &state.models,
        &input.prompt,
        &cancel,
    )
    .await?;

    record_usage(&state, user.user_id, UsageCategory::Videos).await;

    Ok(Json(VideoResponse {
        success: true,
        video_url,
    }))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Bump the user's usage counter for a successful generation.
///
/// Failures are logged and swallowed: the artifact was already produced,
/// so an accounting hiccup must not turn a success into an error response.
async fn record_usage(state: &AppState, user_id: DbId, category: UsageCategory) {
    if let Err(err) = state.users.record_usage(user_id, category).await {
        tracing::warn!(
            user_id,
            column = category.column(),
            error = %err,
            "Failed to record usage after successful generation"
        );
    }
}
