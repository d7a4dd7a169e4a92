//! Pure domain logic for the Mirage generation platform.
//!
//! This crate has no async code and no I/O.  It defines the job model
//! shared by the provider client and the pipeline, the polling policy,
//! usage accounting categories, and input validation.

pub mod error;
pub mod job;
pub mod polling;
pub mod types;
pub mod usage;
