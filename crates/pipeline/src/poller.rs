//! Bounded poll-to-completion loop for a single generation job.

use mirage_core::job::{GenerationJob, JobStatus};
use mirage_core::polling::PollPolicy;
use mirage_replicate::PredictionsApi;
use tokio_util::sync::CancellationToken;

use crate::error::GenerateError;

/// Poll a submitted job until it reaches a terminal state.
///
/// One status check per attempt, up to `policy.max_attempts`, sleeping
/// `policy.interval` between consecutive checks.  The loop never runs
/// concurrently with itself and carries nothing between attempts beyond
/// the last observed status (recorded on `job`).
///
/// Outcomes:
/// - `Succeeded` -- returns the first output artifact URL.
/// - `Failed` -- returns [`GenerateError::Failed`] with the provider's
///   error payload; polling stops immediately.
/// - ceiling exhausted -- returns [`GenerateError::TimedOut`] after
///   exactly `max_attempts` status checks.
/// - `cancel` triggered -- returns [`GenerateError::Cancelled`] before
///   the next status check or mid-sleep.
pub async fn poll_until_complete(
    api: &dyn PredictionsApi,
    job: &mut GenerationJob,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<String, GenerateError> {
    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            tracing::info!(job_id = %job.id, kind = %job.kind, "Polling cancelled");
            return Err(GenerateError::Cancelled);
        }

        let prediction = api
            .get_prediction(&job.id)
            .await
            .map_err(|source| GenerateError::StatusCheck {
                kind: job.kind,
                source,
            })?;

        let output = prediction.first_output().map(str::to_string);
        let terminal = job.observe(prediction.status, output, prediction.error.clone());
        tracing::debug!(
            job_id = %job.id,
            kind = %job.kind,
            attempt,
            status = ?job.status,
            "Polled job status",
        );

        if terminal {
            return match job.status {
                JobStatus::Succeeded => job.output.clone().ok_or(GenerateError::MissingOutput {
                    kind: job.kind,
                }),
                _ => {
                    tracing::warn!(
                        job_id = %job.id,
                        kind = %job.kind,
                        attempt,
                        "Provider reported generation failure",
                    );
                    Err(GenerateError::Failed {
                        kind: job.kind,
                        detail: job.error_detail.clone(),
                    })
                }
            };
        }

        // Wait before the next attempt, respecting cancellation. No sleep
        // after the final attempt; exhaustion is reported immediately.
        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(GenerateError::Cancelled),
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    tracing::warn!(
        job_id = %job.id,
        kind = %job.kind,
        max_attempts = policy.max_attempts,
        "Polling attempt ceiling exhausted",
    );
    Err(GenerateError::TimedOut { kind: job.kind })
}
