//! Wire types for the predictions API and provider error normalization.

use mirage_core::job::JobStatus;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `POST /v1/predictions`.
///
/// `input` is model-specific JSON; the fixed parameter sets live in
/// [`crate::models`].
#[derive(Debug, Clone, Serialize)]
pub struct CreatePrediction {
    /// Pinned model version identifier.
    pub version: String,
    /// Model-specific input parameters.
    pub input: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A prediction as reported by the provider.
///
/// Returned both by the submission call (where `status` is typically
/// `starting`) and by status checks.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    /// Provider-issued opaque id.
    pub id: String,
    pub status: JobStatus,
    /// Output artifact URLs, present once the prediction has succeeded.
    #[serde(default)]
    pub output: Option<Vec<String>>,
    /// Raw error payload, present once the prediction has failed.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Prediction {
    /// The first output artifact, which is the one the caller receives.
    pub fn first_output(&self) -> Option<&str> {
        self.output
            .as_deref()
            .and_then(|urls| urls.first())
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Provider error payloads
// ---------------------------------------------------------------------------

/// Known shapes of provider error bodies, with a catch-all fallback.
///
/// The provider is not consistent about how it reports errors; observed
/// shapes are `{ "detail": "..." }`, `{ "error": { "message": "..." } }`,
/// and `{ "error": "..." }`.  [`message`](Self::message) extracts a
/// human-readable message following that precedence order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderError {
    Detail { detail: String },
    Nested { error: NestedError },
    Flat { error: String },
    Other(serde_json::Value),
}

/// The `{ "error": { "message": ... } }` inner object.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedError {
    pub message: String,
}

impl ProviderError {
    /// Extract a human-readable message, if the payload carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ProviderError::Detail { detail } => Some(detail),
            ProviderError::Nested { error } => Some(&error.message),
            ProviderError::Flat { error } => Some(error),
            ProviderError::Other(_) => None,
        }
    }
}
