//! User-facing generation flows.
//!
//! Two shapes only: a single-stage image job, and the fixed two-stage
//! video pipeline (image job whose output feeds a video job).  This is
//! deliberately not a general workflow engine.

use mirage_core::job::{GenerationJob, JobKind};
use mirage_core::polling::PollPolicy;
use mirage_core::usage::validate_prompt;
use mirage_replicate::models::{image_request, video_image_request, video_request};
use mirage_replicate::{ModelVersions, PredictionsApi};
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;
use crate::poller::poll_until_complete;

/// Ephemeral record of one two-stage video run.
///
/// Constructed only once the image stage has succeeded, so a video stage
/// can never exist without a non-empty intermediate artifact.  Lives only
/// for the duration of the request.
#[derive(Debug)]
struct PipelineRun {
    image_stage: GenerationJob,
    /// Image URL carried from stage one into stage two.
    intermediate_artifact: String,
    video_stage: GenerationJob,
}

/// Generate an image from a prompt and return its URL.
///
/// Submits one image job and polls it to completion under the image
/// policy.  An empty or whitespace prompt is rejected before any
/// provider call.
pub async fn generate_image(
    api: &dyn PredictionsApi,
    versions: &ModelVersions,
    prompt: &str,
    cancel: &CancellationToken,
) -> Result<String, GenerateError> {
    let prompt = validate_prompt(prompt)?;

    let prediction = api
        .create_prediction(&image_request(versions, prompt))
        .await
        .map_err(|source| GenerateError::Submission {
            kind: JobKind::Image,
            source,
        })?;

    let mut job = GenerationJob::new(prediction.id, JobKind::Image);
    tracing::info!(job_id = %job.id, "Image job submitted");

    poll_until_complete(api, &mut job, &PollPolicy::for_kind(JobKind::Image), cancel).await
}

/// Generate a video from a prompt and return its URL.
///
/// A strict two-phase sequential machine: submit image, poll image,
/// submit video, poll video.  If the image stage fails or times out the
/// whole pipeline fails with that error and the video stage is never
/// submitted.  Each stage polls under its own independent ceiling.
pub async fn generate_video(
    api: &dyn PredictionsApi,
    versions: &ModelVersions,
    prompt: &str,
    cancel: &CancellationToken,
) -> Result<String, GenerateError> {
    let prompt = validate_prompt(prompt)?;

    // Phase 1: image stage.
    let prediction = api
        .create_prediction(&video_image_request(versions, prompt))
        .await
        .map_err(|source| GenerateError::Submission {
            kind: JobKind::Image,
            source,
        })?;

    let mut image_stage = GenerationJob::new(prediction.id, JobKind::Image);
    tracing::info!(job_id = %image_stage.id, "Video pipeline: image stage submitted");

    let image_url = poll_until_complete(
        api,
        &mut image_stage,
        &PollPolicy::for_kind(JobKind::Image),
        cancel,
    )
    .await?;
    tracing::info!(
        job_id = %image_stage.id,
        intermediate = %image_url,
        "Video pipeline: image stage complete",
    );

    // Phase 2: video stage, driven by the intermediate image.
    let prediction = api
        .create_prediction(&video_request(versions, &image_url))
        .await
        .map_err(|source| GenerateError::Submission {
            kind: JobKind::Video,
            source,
        })?;

    let mut run = PipelineRun {
        image_stage,
        intermediate_artifact: image_url,
        video_stage: GenerationJob::new(prediction.id, JobKind::Video),
    };
    tracing::info!(job_id = %run.video_stage.id, "Video pipeline: video stage submitted");

    let video_url = poll_until_complete(
        api,
        &mut run.video_stage,
        &PollPolicy::for_kind(JobKind::Video),
        cancel,
    )
    .await?;
    tracing::info!(
        image_job = %run.image_stage.id,
        video_job = %run.video_stage.id,
        intermediate = %run.intermediate_artifact,
        "Video pipeline complete",
    );
    Ok(video_url)
}
