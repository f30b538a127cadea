// src/error.rs
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid request body: {}", .0.body_text())]
    JsonBody(#[from] JsonRejection),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidDate(_) | AppError::BadRequest(_) | AppError::Csv(_) => {
                warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::JsonBody(rejection) => {
                warn!("Rejected request body: {}", self);
                (rejection.status(), self.to_string())
            }
            AppError::Config(_) | AppError::Io(_) => {
                error!("Error occurred: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error. Check logs.".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn error_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_config_error_is_hidden_behind_500() {
        let vars = vec![("SERVER_PORT".to_string(), "not-a-port".to_string())];
        let err: AppError = envy::from_iter::<_, Config>(vars).unwrap_err().into();
        assert!(matches!(err, AppError::Config(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = error_body(response).await;
        assert_eq!(body["error"], "Internal server error. Check logs.");
    }

    #[tokio::test]
    async fn test_bad_request_carries_message() {
        let response = AppError::BadRequest("Unknown camera x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"], "Bad request: Unknown camera x");
    }
}
