//! HTTP client for the Replicate predictions API.
//!
//! A generation request is a two-step conversation: `POST /v1/predictions`
//! submits a job and returns a provider-issued id, then
//! `GET /v1/predictions/{id}` reports its status until the job reaches a
//! terminal state.  This crate covers the wire types, the authenticated
//! [`reqwest`] client, and normalization of the provider's loosely-shaped
//! error payloads.  The poll-to-completion loop itself lives in
//! `mirage-pipeline`.

pub mod api;
pub mod config;
pub mod models;
pub mod prediction;

pub use api::{PredictionsApi, ReplicateApi, ReplicateApiError};
pub use config::{ModelVersions, ReplicateConfig};
pub use prediction::{CreatePrediction, Prediction, ProviderError};
