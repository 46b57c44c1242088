//! Error types for readling-de
//!
//! The taxonomy lets callers distinguish "needs a different prompt"
//! (`Exhausted`), "infrastructure is down" (`Collaborator`), and plumbing
//! failures. All engine failures are typed results; nothing in the engine
//! panics on user input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use readling_common::decodability::DecodabilityReport;
use readling_common::story::GenerationCost;
use serde_json::json;
use thiserror::Error;

use crate::generation::GeneratorError;

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// The regeneration loop ran out of attempts without crossing the
    /// decodability threshold. Carries the last report and the cumulative
    /// cost so operators can see how close it got and what it spent.
    /// User-visible as "could not produce a story that fits this child's
    /// current phonics level".
    #[error("story generation exhausted {attempts} attempts (last token score {score:.3})", score = .report.token_score)]
    Exhausted {
        attempts: u32,
        report: DecodabilityReport,
        cost: GenerationCost,
    },

    /// The external generation collaborator failed. Surfaced as-is; the
    /// loop does not retry beyond its normal attempt budget.
    #[error("generation collaborator failed: {0}")]
    Collaborator(#[from] GeneratorError),

    /// Generation was cancelled between attempts.
    #[error("story generation cancelled")]
    Cancelled,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// readling-common error
    #[error("Common error: {0}")]
    Common(#[from] readling_common::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, error_code, message, detail) = match self {
            EngineError::Exhausted {
                attempts,
                ref report,
                ref cost,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DECODABILITY_EXHAUSTED",
                format!(
                    "could not produce a story that fits this phonics level in {} attempts",
                    attempts
                ),
                Some(json!({ "report": report, "cost": cost })),
            ),
            EngineError::Collaborator(ref err) => (
                StatusCode::BAD_GATEWAY,
                "COLLABORATOR_FAILURE",
                err.to_string(),
                None,
            ),
            EngineError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CANCELLED",
                "story generation cancelled".to_string(),
                None,
            ),
            EngineError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                msg,
                None,
            ),
            EngineError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
                None,
            ),
            EngineError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
                None,
            ),
            EngineError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
                None,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "detail": detail,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
