use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mirage_core::error::CoreError;
use mirage_db::store::UserStoreError;
use mirage_pipeline::GenerateError;
use mirage_replicate::ReplicateApiError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`GenerateError`] for the
/// generation pipeline. Implements [`IntoResponse`] to produce consistent
/// JSON error responses of the shape `{ "error": ..., "code": ..., "details"?: ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mirage_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A generation pipeline error.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// A user storage error.
    #[error(transparent)]
    Store(#[from] UserStoreError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Generation pipeline errors ---
            AppError::Generate(err) => classify_generate_error(err),

            // --- Storage errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "User store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

type ErrorParts = (
    StatusCode,
    &'static str,
    String,
    Option<serde_json::Value>,
);

fn classify_core_error(core: &CoreError) -> ErrorParts {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
        }
        CoreError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}

/// Classify a generation error into an HTTP status, error code, message,
/// and optional raw provider details.
///
/// Provider call failures reuse the HTTP status the provider reported
/// (falling back to 500 when the failure was local, e.g. a network error),
/// and surface the normalized provider message rather than the wrapper text.
fn classify_generate_error(err: &GenerateError) -> ErrorParts {
    let details = err.details().cloned();

    match err {
        // A rejected prompt maps exactly like a direct validation error.
        GenerateError::Validation(core) => classify_core_error(core),

        GenerateError::Submission { kind, source }
        | GenerateError::StatusCheck { kind, source } => {
            let status = err
                .provider_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = match source {
                ReplicateApiError::Api { message, .. } => message.clone(),
                _ => {
                    tracing::error!(error = %source, %kind, "Provider request failed");
                    format!("{kind} generation failed")
                }
            };
            (status, "PROVIDER_ERROR", message, details)
        }

        GenerateError::Failed { .. } | GenerateError::MissingOutput { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_FAILED",
            err.to_string(),
            details,
        ),

        GenerateError::TimedOut { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_TIMEOUT",
            err.to_string(),
            details,
        ),

        GenerateError::Cancelled => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CANCELLED",
            err.to_string(),
            details,
        ),
    }
}
