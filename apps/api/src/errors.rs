use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scouting::dedup::DuplicateProfileWarning;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Shorthand report with fewer than four comma-separated fields.
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("Duplicate profile: {0}")]
    DuplicateProfile(DuplicateProfileWarning),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MalformedReport(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_REPORT",
                msg.clone(),
            ),
            AppError::DuplicateProfile(warning) => {
                tracing::info!("Rejected duplicate profile: {warning}");
                (StatusCode::CONFLICT, "DUPLICATE_PROFILE", warning.to_string())
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_report_is_unprocessable() {
        let response = AppError::MalformedReport("expected 4 fields".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let warning = DuplicateProfileWarning {
            existing_index: 0,
            existing_name: "Gabriel Sanabria".to_string(),
            birth_year: 2008,
        };
        let response = AppError::DuplicateProfile(warning).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_envelope_codes() {
        for (error, status, code) in [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), status);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"]["code"], code);
        }
    }

    #[test]
    fn test_storage_error_hides_detail() {
        let response = AppError::Storage("disk full".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
