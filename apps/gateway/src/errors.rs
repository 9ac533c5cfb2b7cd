use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every endpoint reports failures the same way: a non-2xx status and an
/// `{"error": {...}}` body whose `code` tells the caller which kind it was.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The call to the generative provider itself failed.
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] LlmError),

    /// The provider answered, but the text is not JSON even after fence stripping.
    #[error("Model output is not valid JSON: {json_error}")]
    MalformedOutput { raw: String, json_error: String },

    /// Valid JSON, wrong shape.
    #[error("Model output has an unexpected shape: {reason}")]
    SchemaViolation { raw: String, reason: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::SchemaViolation { .. } => StatusCode::BAD_REQUEST,
            AppError::MalformedOutput { .. } => StatusCode::BAD_GATEWAY,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::MalformedOutput { .. } => "MALFORMED_MODEL_OUTPUT",
            AppError::SchemaViolation { .. } => "SCHEMA_VIOLATION",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut error = Map::new();
        error.insert("code".to_string(), json!(self.code()));

        match &self {
            AppError::Validation(msg) => {
                error.insert("message".to_string(), json!(msg));
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {e}");
                error.insert("message".to_string(), json!(self.to_string()));
            }
            AppError::MalformedOutput { raw, json_error } => {
                tracing::warn!("Malformed model output ({json_error}): {raw}");
                error.insert(
                    "message".to_string(),
                    json!("The model response is not valid JSON"),
                );
                error.insert("raw".to_string(), json!(raw));
                error.insert("json_error".to_string(), json!(json_error));
            }
            AppError::SchemaViolation { raw, reason } => {
                tracing::warn!("Model output shape mismatch ({reason}): {raw}");
                error.insert("message".to_string(), json!(self.to_string()));
                error.insert("raw".to_string(), json!(raw));
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                error.insert(
                    "message".to_string(),
                    json!("An internal server error occurred"),
                );
            }
        }

        let body = Json(json!({ "error": Value::Object(error) }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_output_carries_raw_and_parser_error() {
        let (status, body) = body_json(AppError::MalformedOutput {
            raw: "sorry, I can't help".to_string(),
            json_error: "expected value at line 1 column 1".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "MALFORMED_MODEL_OUTPUT");
        assert_eq!(body["error"]["raw"], "sorry, I can't help");
        assert!(body["error"]["json_error"].is_string());
    }

    #[tokio::test]
    async fn test_schema_violation_is_bad_request_with_raw() {
        let (status, body) = body_json(AppError::SchemaViolation {
            raw: "{}".to_string(),
            reason: "expected a JSON array".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "SCHEMA_VIOLATION");
        assert_eq!(body["error"]["raw"], "{}");
        assert!(body["error"].get("json_error").is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_is_internal_without_raw() {
        let (status, body) = body_json(AppError::Upstream(LlmError::EmptyContent)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("empty content"));
        assert!(body["error"].get("raw").is_none());
    }

    #[tokio::test]
    async fn test_validation_error_keeps_message() {
        let (status, body) =
            body_json(AppError::Validation("cv cannot be empty".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "cv cannot be empty");
    }
}
