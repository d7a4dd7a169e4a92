//! Error taxonomy for the generation flows.

use mirage_core::error::CoreError;
use mirage_core::job::JobKind;
use mirage_replicate::ReplicateApiError;

/// Everything that can go wrong between accepting a prompt and returning
/// an artifact URL.
///
/// Only `Validation` happens before an outbound call; nothing here is
/// ever retried automatically -- the fixed-interval re-polling of an
/// in-progress job waits for an operation the provider already accepted,
/// it does not re-submit anything.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The caller's request was rejected before any provider call.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The submission call itself failed (network, non-2xx, bad body).
    #[error("{kind} generation could not be submitted: {source}")]
    Submission {
        kind: JobKind,
        #[source]
        source: ReplicateApiError,
    },

    /// A status check failed mid-poll.
    #[error("{kind} generation status check failed: {source}")]
    StatusCheck {
        kind: JobKind,
        #[source]
        source: ReplicateApiError,
    },

    /// The provider reported a terminal failure for the job.
    #[error("{kind} generation failed")]
    Failed {
        kind: JobKind,
        /// Raw provider error payload, when one was reported.
        detail: Option<serde_json::Value>,
    },

    /// The attempt ceiling was exhausted without a terminal status.
    #[error("{kind} generation timed out")]
    TimedOut { kind: JobKind },

    /// The provider reported success but no output artifact.
    #[error("{kind} generation succeeded without an output artifact")]
    MissingOutput { kind: JobKind },

    /// The caller cancelled the operation; polling stopped.
    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerateError {
    /// HTTP status reported by the provider, when one was observed.
    ///
    /// Callers fall back to 500 when this is `None`.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            GenerateError::Submission { source, .. }
            | GenerateError::StatusCheck { source, .. } => source.provider_status(),
            _ => None,
        }
    }

    /// Raw provider payload to surface as error `details`, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            GenerateError::Submission { source, .. }
            | GenerateError::StatusCheck { source, .. } => source.payload(),
            GenerateError::Failed { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}
