//! Email send endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::mail::{DispatchOutcome, EmailRequest};
use crate::server::AppState;

/// Body returned when the transport accepted the message
pub const SENT_MESSAGE: &str = "Email sent successfully";

/// POST /send-email - Send a direct or templated email, or return a compose link
#[tracing::instrument(name = "http.send_email", skip(state, payload))]
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload?;
    let request = EmailRequest::from_json(body).map_err(AppError::Validation)?;

    tracing::debug!(
        template = ?request.template_name(),
        preview = request.wants_preview(),
        "Dispatching email"
    );

    match state.dispatcher.dispatch(&request).await? {
        DispatchOutcome::Sent(_) => Ok((StatusCode::OK, SENT_MESSAGE).into_response()),
        DispatchOutcome::Preview { gmail_url } => {
            Ok(Json(json!({ "gmailUrl": gmail_url })).into_response())
        }
    }
}
