use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single failed request check, reported back to the client.
///
/// Serialized as `{ "msg", "param", "location" }`, the shape existing clients parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "param")]
    pub field: String,
    pub location: String,
}

impl FieldError {
    /// Error about a field of the JSON request body
    pub fn body(field: &str, message: &str) -> Self {
        Self {
            message: message.to_string(),
            field: field.to_string(),
            location: "body".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An external collaborator failed; `context` is the client-facing summary.
    #[error("{context}: {message}")]
    Dependency {
        context: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.field))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unreadable bodies (bad JSON, wrong content type, mistyped fields) are a
/// client error reported in the validation shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::body("body", &rejection.body_text())])
    }
}

impl AppError {
    pub fn dependency(context: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Dependency {
            context,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Dependency { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %self, "API error");
        } else {
            tracing::warn!(status = %status.as_u16(), error = %self, "Request rejected");
        }

        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::NotFound(message) => json!({ "error": message }),
            AppError::Dependency { context, message } => json!({
                "error": context,
                "message": message,
            }),
            AppError::Config(e) => {
                let message = if is_production() {
                    "Configuration error".to_string()
                } else {
                    e.to_string()
                };
                json!({ "error": "Internal server error", "message": message })
            }
            AppError::Internal(e) => {
                let message = if is_production() {
                    "Internal server error".to_string()
                } else {
                    e
                };
                json!({ "error": "Internal server error", "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
