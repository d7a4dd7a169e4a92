//! Fixed generation parameters and request builders.
//!
//! Every flow submits a pinned model version with a fixed parameter set;
//! only the prompt (or the intermediate image URL) varies per request.

use serde_json::json;

use crate::config::ModelVersions;
use crate::prediction::CreatePrediction;

// ---------------------------------------------------------------------------
// Image parameters (single-stage flow)
// ---------------------------------------------------------------------------

pub const IMAGE_WIDTH: u32 = 512;
pub const IMAGE_HEIGHT: u32 = 512;
pub const IMAGE_GUIDANCE_SCALE: f64 = 7.5;
pub const IMAGE_INFERENCE_STEPS: u32 = 30;

// ---------------------------------------------------------------------------
// Video parameters (second stage of the pipeline)
// ---------------------------------------------------------------------------

pub const VIDEO_MOTION_BUCKET_ID: u32 = 127;
pub const VIDEO_FPS: u32 = 6;
pub const VIDEO_COND_AUG: f64 = 0.02;
pub const VIDEO_DECODING_T: u32 = 7;
pub const VIDEO_SEED: u32 = 42;

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// Submission body for the single-stage image flow.
pub fn image_request(versions: &ModelVersions, prompt: &str) -> CreatePrediction {
    CreatePrediction {
        version: versions.image.clone(),
        input: json!({
            "prompt": prompt,
            "width": IMAGE_WIDTH,
            "height": IMAGE_HEIGHT,
            "guidance_scale": IMAGE_GUIDANCE_SCALE,
            "num_inference_steps": IMAGE_INFERENCE_STEPS,
        }),
    }
}

/// Submission body for the image stage of the video pipeline (SDXL).
pub fn video_image_request(versions: &ModelVersions, prompt: &str) -> CreatePrediction {
    CreatePrediction {
        version: versions.sdxl.clone(),
        input: json!({ "prompt": prompt }),
    }
}

/// Submission body for the video stage, driven by the intermediate image.
pub fn video_request(versions: &ModelVersions, image_url: &str) -> CreatePrediction {
    CreatePrediction {
        version: versions.video.clone(),
        input: json!({
            "input_image": image_url,
            "motion_bucket_id": VIDEO_MOTION_BUCKET_ID,
            "fps": VIDEO_FPS,
            "cond_aug": VIDEO_COND_AUG,
            "decoding_t": VIDEO_DECODING_T,
            "seed": VIDEO_SEED,
        }),
    }
}
