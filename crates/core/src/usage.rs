//! Per-user usage accounting categories and prompt validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::job::JobKind;

// ---------------------------------------------------------------------------
// Usage categories
// ---------------------------------------------------------------------------

/// Billable service categories tracked per user.
///
/// Each category maps to one monotonically increasing counter column on
/// the `users` table.  Counters are never decremented or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageCategory {
    Images,
    Audio,
    Videos,
}

impl UsageCategory {
    /// Counter column on the `users` table for this category.
    ///
    /// The mapping is a closed enum, so interpolating the result into a
    /// SQL statement cannot inject arbitrary identifiers.
    pub fn column(self) -> &'static str {
        match self {
            UsageCategory::Images => "usage_images",
            UsageCategory::Audio => "usage_audio",
            UsageCategory::Videos => "usage_videos",
        }
    }
}

impl From<JobKind> for UsageCategory {
    fn from(kind: JobKind) -> Self {
        match kind {
            JobKind::Image => UsageCategory::Images,
            JobKind::Video => UsageCategory::Videos,
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt validation
// ---------------------------------------------------------------------------

/// Validate a natural-language prompt before any provider call is made.
///
/// Returns the trimmed prompt. Empty or whitespace-only prompts are
/// rejected with a `Validation` error.
pub fn validate_prompt(prompt: &str) -> Result<&str, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Prompt is required".to_string()));
    }
    Ok(trimmed)
}
