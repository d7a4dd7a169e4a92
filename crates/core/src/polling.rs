//! Polling policy for in-progress generation jobs.
//!
//! Every polling loop is bounded by a maximum-attempts parameter;
//! exhausting it is reported as a timeout rather than looping forever.

use std::time::Duration;

use crate::job::JobKind;

/// Hard ceiling on status-check attempts for every polling loop.
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// Delay between status checks for image jobs.
pub const IMAGE_POLL_INTERVAL_MS: u64 = 2000;

/// Delay between status checks for video jobs.  Video renders are slower,
/// so they are polled less aggressively.
pub const VIDEO_POLL_INTERVAL_MS: u64 = 3000;

/// How often and how long a job may be polled before timing out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of status checks before declaring a timeout.
    pub max_attempts: u32,
    /// Sleep between consecutive status checks.
    pub interval: Duration,
}

impl PollPolicy {
    /// The default policy for a job kind.
    pub fn for_kind(kind: JobKind) -> Self {
        match kind {
            JobKind::Image => Self {
                max_attempts: MAX_POLL_ATTEMPTS,
                interval: Duration::from_millis(IMAGE_POLL_INTERVAL_MS),
            },
            JobKind::Video => Self {
                max_attempts: MAX_POLL_ATTEMPTS,
                interval: Duration::from_millis(VIDEO_POLL_INTERVAL_MS),
            },
        }
    }
}
