// Error types for the AI gateway and its HTTP surface

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the AI gateway.
///
/// Every upstream failure collapses into one of these kinds. The gateway never
/// retries; callers decide what to do with each kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("AI service authentication failed")]
    AuthenticationFailed,

    #[error("AI service rate limit exceeded")]
    RateLimited,

    #[error("AI service request timeout")]
    Timeout,
}

impl AiServiceError {
    /// Stable machine-readable kind, used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AiServiceError::InvalidInput(_) => "invalid_input",
            AiServiceError::ServiceUnavailable(_) => "service_unavailable",
            AiServiceError::AuthenticationFailed => "authentication_failed",
            AiServiceError::RateLimited => "rate_limited",
            AiServiceError::Timeout => "timeout",
        }
    }

    /// Message safe to show to end users. Never contains upstream bodies.
    pub fn public_message(&self) -> String {
        match self {
            AiServiceError::InvalidInput(msg) => msg.clone(),
            AiServiceError::ServiceUnavailable(_) => "AI service temporarily unavailable".to_string(),
            AiServiceError::AuthenticationFailed => "AI service authentication failed".to_string(),
            AiServiceError::RateLimited => {
                "AI service rate limit exceeded. Please try again later".to_string()
            }
            AiServiceError::Timeout => "AI service request timeout".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AiServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AiServiceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// A single failed field in a request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Secret error: {0}")]
    Secret(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Ai(#[from] AiServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convert AppError to the error envelope for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message, details) = match &self {
            AppError::Ai(e) => (e.status_code(), Some(e.kind()), e.public_message(), None),
            AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, Some("invalid_request"), self.to_string(), None)
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Some("validation_error"),
                self.to_string(),
                Some(json!(errors)),
            ),
            // Internal details stay in the logs
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "An error occurred".to_string(),
                None,
            ),
        };

        let mut error = json!({
            "message": message,
            "code": status.as_u16(),
        });
        if let Some(kind) = kind {
            error["kind"] = json!(kind);
        }
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = json!({
            "success": false,
            "error": error,
            "timestamp": crate::utils::timestamp(),
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
