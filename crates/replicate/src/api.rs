//! Authenticated REST client for the predictions API.
//!
//! [`PredictionsApi`] is the seam between the pipeline and the provider:
//! the pipeline only ever talks to the trait, so tests can substitute a
//! scripted implementation with no network involved.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ReplicateConfig;
use crate::prediction::{CreatePrediction, Prediction, ProviderError};

/// The two calls the generation flows make against the provider.
#[async_trait]
pub trait PredictionsApi: Send + Sync {
    /// Submit a new prediction. One outbound call; never retried.
    async fn create_prediction(
        &self,
        request: &CreatePrediction,
    ) -> Result<Prediction, ReplicateApiError>;

    /// Fetch the current status of a prediction.
    async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateApiError>;
}

/// Errors from the provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Replicate API error ({status}): {message}")]
    Api {
        /// HTTP status code reported by the provider.
        status: u16,
        /// Normalized human-readable message (see [`ProviderError`]).
        message: String,
        /// Raw error payload, when the body was JSON.
        payload: Option<serde_json::Value>,
    },
}

impl ReplicateApiError {
    /// The provider-reported HTTP status, if one was observed.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            ReplicateApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ReplicateApiError::Api { status, .. } => Some(*status),
        }
    }

    /// The raw provider error payload, if one was captured.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            ReplicateApiError::Request(_) => None,
            ReplicateApiError::Api { payload, .. } => payload.as_ref(),
        }
    }
}

/// HTTP client for the Replicate predictions API.
pub struct ReplicateApi {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ReplicateApi {
    /// Build a client from provider configuration.
    ///
    /// The underlying [`reqwest::Client`] applies the configured
    /// per-request timeout to every call, including submission.
    pub fn new(config: &ReplicateConfig) -> Result<Self, ReplicateApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise normalize
    /// the error body into a [`ReplicateApiError::Api`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ReplicateApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let payload: Option<serde_json::Value> = serde_json::from_str(&body).ok();
        let message = payload
            .as_ref()
            .and_then(|value| {
                serde_json::from_value::<ProviderError>(value.clone())
                    .ok()
                    .and_then(|e| e.message().map(str::to_string))
            })
            .unwrap_or_else(|| format!("Provider returned HTTP {}", status.as_u16()));

        Err(ReplicateApiError::Api {
            status: status.as_u16(),
            message,
            payload,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ReplicateApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PredictionsApi for ReplicateApi {
    async fn create_prediction(
        &self,
        request: &CreatePrediction,
    ) -> Result<Prediction, ReplicateApiError> {
        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header("Authorization", format!("Token {}", self.api_token))
            .json(request)
            .send()
            .await?;

        let prediction: Prediction = Self::parse_response(response).await?;
        tracing::info!(
            prediction_id = %prediction.id,
            version = %request.version,
            "Prediction submitted",
        );
        Ok(prediction)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateApiError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.base_url, id))
            .header("Authorization", format!("Token {}", self.api_token))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
