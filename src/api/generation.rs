//! Content generation endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    response::Response,
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::generation::{ContentRequest, ContentResponse, MessageRequest, MessageResponse};
use crate::server::AppState;

fn message_failure(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

/// POST /api/message/generate - Generate and record a message
#[tracing::instrument(name = "http.generate_message", skip(state, payload))]
pub async fn generate_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected message request body");
            return message_failure(StatusCode::BAD_REQUEST, "Invalid request body.");
        }
    };

    match state.messages.generate_message(&request).await {
        Ok(response) => Json(MessageResponse {
            success: true,
            response,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Message generation failed");
            message_failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate message.")
        }
    }
}

/// POST /generate-email-content - Draft a friendly email and split out its subject
#[tracing::instrument(name = "http.generate_email_content", skip(state, payload))]
pub async fn generate_email_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<ContentResponse>, AppError> {
    let Json(request) = payload?;
    let generated_content = state.messages.generate_content(&request.prompt).await?;

    Ok(Json(ContentResponse {
        success: true,
        generated_content,
    }))
}
