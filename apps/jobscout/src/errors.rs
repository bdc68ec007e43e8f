use thiserror::Error;

use crate::llm_client::LlmError;

/// Pipeline-level error type.
///
/// Per-company and per-job variants are accumulated by the callers that
/// produce them; none of them aborts a batch on its own.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("External model error: {0}")]
    ExternalModel(String),

    #[error("Ambiguous reference '{prefix}' matches {count} records")]
    AmbiguousReference { prefix: String, count: usize },

    #[error("Cancelled before {0} was processed")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::ExternalModel(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Fetch(e.to_string())
    }
}

impl AppError {
    /// Short machine-readable code, used in log fields and batch summaries.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::ExternalModel(_) => "EXTERNAL_MODEL_ERROR",
            AppError::AmbiguousReference { .. } => "AMBIGUOUS_REFERENCE",
            AppError::Cancelled(_) => "CANCELLED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
