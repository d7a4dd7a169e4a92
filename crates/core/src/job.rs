//! Generation job model.
//!
//! A [`GenerationJob`] tracks one asynchronous unit of work accepted by
//! the external generation provider.  Jobs live only for the duration of
//! the request that created them; nothing here is persisted.
//!
//! Status transitions are monotone: `Queued`/`Processing` can move to
//! `Succeeded` or `Failed`, and the terminal states are absorbing.  The
//! poller enforces this by stopping at the first terminal observation;
//! [`GenerationJob::observe`] additionally ignores any update applied
//! after a terminal status has been recorded.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Job kind
// ---------------------------------------------------------------------------

/// Which kind of artifact a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Image,
    Video,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Image => write!(f, "Image"),
            JobKind::Video => write!(f, "Video"),
        }
    }
}

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job.
///
/// The provider reports a handful of raw status strings; they collapse
/// onto four states:
///
/// | Provider string          | Status       |
/// |--------------------------|--------------|
/// | `starting`, `queued`     | `Queued`     |
/// | `processing`             | `Processing` |
/// | `succeeded`              | `Succeeded`  |
/// | `failed`, `canceled`     | `Failed`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[serde(alias = "starting")]
    Queued,
    Processing,
    Succeeded,
    #[serde(alias = "canceled")]
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions occur).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

// ---------------------------------------------------------------------------
// Generation job
// ---------------------------------------------------------------------------

/// One asynchronous generation job, identified by a provider-issued id.
///
/// Created in `Queued` state on submission and mutated only by polling
/// responses via [`observe`](Self::observe).
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Opaque identifier issued by the provider.
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Artifact URL extracted from the provider output, once succeeded.
    pub output: Option<String>,
    /// Raw provider error payload, once failed.
    pub error_detail: Option<serde_json::Value>,
}

impl GenerationJob {
    /// Create a job in `Queued` state from a provider-issued id.
    pub fn new(id: impl Into<String>, kind: JobKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: JobStatus::Queued,
            output: None,
            error_detail: None,
        }
    }

    /// Apply one polled status observation.
    ///
    /// Returns `true` if the job is now (or already was) terminal.
    /// Observations arriving after a terminal status are ignored, keeping
    /// terminal states absorbing even if a caller keeps polling.
    pub fn observe(
        &mut self,
        status: JobStatus,
        output: Option<String>,
        error_detail: Option<serde_json::Value>,
    ) -> bool {
        if self.status.is_terminal() {
            return true;
        }
        self.status = status;
        if status == JobStatus::Succeeded {
            self.output = output;
        }
        if status == JobStatus::Failed {
            self.error_detail = error_detail;
        }
        self.status.is_terminal()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
