use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::normalize::SchemaParseError;
use crate::analysis::staging::StagingError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please upload a resume file (PDF only)")]
    MissingFile,

    #[error("Only PDF files are allowed (received {0})")]
    UnsupportedType(String),

    #[error("File exceeds the {limit_mib} MB upload limit")]
    SizeLimitExceeded { limit_mib: usize },

    #[error("Malformed upload: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[source] LlmError),

    #[error("{0}")]
    SchemaParse(#[from] SchemaParseError),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StagingError> for AppError {
    fn from(e: StagingError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AppError::Configuration(e.to_string()),
            other => AppError::ModelInvocation(other),
        }
    }
}

/// JSON envelope returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::UnsupportedType(_)
            | AppError::SizeLimitExceeded { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SchemaParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_)
            | AppError::ModelInvocation(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            AppError::SchemaParse(e) => {
                ("Failed to process resume".to_string(), Some(e.to_string()))
            }
            AppError::Configuration(_) | AppError::ModelInvocation(_) | AppError::Internal(_) => {
                ("Internal Server Error".to_string(), Some(self.to_string()))
            }
            // Storage details stay in the logs.
            AppError::Storage(_) => ("Internal Server Error".to_string(), None),
            other => (other.to_string(), None),
        };
        ErrorBody {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::SchemaParse(e) => tracing::warn!("Model output rejected: {e}"),
            AppError::Configuration(msg) => tracing::error!("Configuration error: {msg}"),
            AppError::ModelInvocation(e) => tracing::error!("LLM error: {e}"),
            AppError::Storage(e) => tracing::error!("Storage error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:#}"),
            _ => {}
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_errors_are_bad_request_without_detail() {
        for err in [
            AppError::MissingFile,
            AppError::UnsupportedType("image/png".to_string()),
            AppError::SizeLimitExceeded { limit_mib: 5 },
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            let body = err.body();
            assert!(!body.success);
            assert!(body.error.is_none());
        }
    }

    #[test]
    fn test_schema_parse_is_unprocessable_with_detail() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = AppError::SchemaParse(SchemaParseError::new(parse_err));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = err.body();
        assert_eq!(body.message, "Failed to process resume");
        assert!(body.error.is_some());
    }

    #[test]
    fn test_missing_api_key_maps_to_configuration_error() {
        let err = AppError::from(LlmError::MissingApiKey);
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_empty_content_maps_to_model_invocation_error() {
        let err = AppError::from(LlmError::EmptyContent);
        assert!(matches!(err, AppError::ModelInvocation(_)));
        let body = err.body();
        assert_eq!(body.message, "Internal Server Error");
        assert!(body.error.unwrap().contains("empty"));
    }

    #[test]
    fn test_storage_error_hides_detail() {
        let err = AppError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body().error.is_none());
    }
}
