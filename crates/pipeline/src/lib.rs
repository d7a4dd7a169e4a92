//! Submit-and-poll orchestration for generation jobs.
//!
//! The provider accepts a job and answers status checks; everything
//! between "accepted" and "done" is this crate's problem.  [`poller`]
//! drives a single job to a terminal state under a bounded attempt
//! budget, and [`orchestrator`] composes submissions and polls into the
//! two user-facing flows (single-stage image, two-stage image-then-video).
//!
//! Every operation takes a [`tokio_util::sync::CancellationToken`]; a
//! cancelled token stops further polling at the next opportunity.

pub mod error;
pub mod orchestrator;
pub mod poller;

pub use error::GenerateError;
pub use orchestrator::{generate_image, generate_video};

#[cfg(test)]
pub(crate) mod mock;
