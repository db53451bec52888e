use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::transcription::TranscriptionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more of the inputs a turn needs is empty. Carries the field names
    /// so the client can prompt for exactly those.
    #[error("Missing input: {}", .0.join(", "))]
    MissingInput(Vec<&'static str>),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::MissingInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_INPUT"),
            AppError::Llm(_) => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            AppError::Transcription(_) => (StatusCode::BAD_GATEWAY, "TRANSCRIPTION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::MissingInput(fields) => {
                format!("Provide the following before continuing: {}", fields.join(", "))
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                "The answer could not be generated. Try again.".to_string()
            }
            AppError::Transcription(e) => {
                tracing::error!("Transcription error: {e}");
                "The question could not be transcribed. Try again.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::MissingInput(fields) = &self {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_input_lists_fields() {
        let (status, body) = body_json(AppError::MissingInput(vec!["resume", "company"])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MISSING_INPUT");
        assert_eq!(body["error"]["fields"], json!(["resume", "company"]));
    }

    #[tokio::test]
    async fn test_llm_error_hides_provider_detail() {
        let err = AppError::Llm(LlmError::Api {
            status: 401,
            message: "invalid api key sk-123".to_string(),
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(!body["error"]["message"].as_str().unwrap().contains("sk-123"));
    }

    #[tokio::test]
    async fn test_not_found_passes_message_through() {
        let (status, body) = body_json(AppError::NotFound("Session x not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Session x not found");
        assert!(body["error"].get("fields").is_none());
    }
}
