//! Provider configuration.
//!
//! API tokens and model version pins are injected configuration, loaded
//! once at startup and passed into [`ReplicateApi`](crate::ReplicateApi)
//! and the pipeline.  Nothing in this crate reads the environment at
//! request time.

use std::time::Duration;

/// Default base URL of the Replicate API.
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Timeout applied to each outbound HTTP call (submission and status
/// checks alike), so a hung provider cannot stall a request forever.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Stable Diffusion version used by the single-stage image flow.
pub const IMAGE_MODEL_VERSION: &str =
    "ac732df83cea7fff18b8472768c88ad041fa750ff7682a21affe81863cbe77e4";

/// SDXL version used for the image stage of the video pipeline.
pub const SDXL_MODEL_VERSION: &str =
    "stability-ai/sdxl:c221b2b8ef527988fb59bf24a8b97c4561f1c671f73bd389f866bfb27c061316";

/// Stable Video Diffusion version used for the video stage.
pub const VIDEO_MODEL_VERSION: &str =
    "stability-ai/stable-video-diffusion:3f0457e4619daac51203dedb472816fd4af51f3149fa7a9e0b5ffcf1b8172438";

/// Pinned model versions for each generation flow.
///
/// Kept separate from [`ReplicateConfig`] so the pipeline can be driven
/// in tests without an API token.
#[derive(Debug, Clone)]
pub struct ModelVersions {
    /// Model for the single-stage image flow.
    pub image: String,
    /// Model for the image stage of the video pipeline.
    pub sdxl: String,
    /// Model for the video stage of the video pipeline.
    pub video: String,
}

impl Default for ModelVersions {
    fn default() -> Self {
        Self {
            image: IMAGE_MODEL_VERSION.to_string(),
            sdxl: SDXL_MODEL_VERSION.to_string(),
            video: VIDEO_MODEL_VERSION.to_string(),
        }
    }
}

/// Connection settings for the Replicate API.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    /// Bearer token for the `Authorization` header.
    pub api_token: String,
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout for outbound calls.
    pub request_timeout: Duration,
    /// Pinned model versions.
    pub models: ModelVersions,
}

impl ReplicateConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var                          | Required | Default                       |
    /// |----------------------------------|----------|-------------------------------|
    /// | `REPLICATE_API_TOKEN`            | **yes**  | --                            |
    /// | `REPLICATE_BASE_URL`             | no       | `https://api.replicate.com`   |
    /// | `REPLICATE_REQUEST_TIMEOUT_SECS` | no       | `30`                          |
    /// | `REPLICATE_IMAGE_MODEL`          | no       | pinned Stable Diffusion       |
    /// | `REPLICATE_SDXL_MODEL`           | no       | pinned SDXL                   |
    /// | `REPLICATE_VIDEO_MODEL`          | no       | pinned Stable Video Diffusion |
    ///
    /// # Panics
    ///
    /// Panics if `REPLICATE_API_TOKEN` is not set or is empty.
    pub fn from_env() -> Self {
        let api_token = std::env::var("REPLICATE_API_TOKEN")
            .expect("REPLICATE_API_TOKEN must be set in the environment");
        assert!(!api_token.is_empty(), "REPLICATE_API_TOKEN must not be empty");

        let base_url = std::env::var("REPLICATE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var("REPLICATE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("REPLICATE_REQUEST_TIMEOUT_SECS must be a valid u64");

        let models = ModelVersions {
            image: std::env::var("REPLICATE_IMAGE_MODEL")
                .unwrap_or_else(|_| IMAGE_MODEL_VERSION.to_string()),
            sdxl: std::env::var("REPLICATE_SDXL_MODEL")
                .unwrap_or_else(|_| SDXL_MODEL_VERSION.to_string()),
            video: std::env::var("REPLICATE_VIDEO_MODEL")
                .unwrap_or_else(|_| VIDEO_MODEL_VERSION.to_string()),
        };

        Self {
            api_token,
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            models,
        }
    }
}
