//! Address verification endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppError;
use crate::server::AppState;
use crate::verification::VerificationReport;

/// GET /verify-email/{email}
#[tracing::instrument(name = "http.verify_email", skip(state, email))]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<VerificationReport>, AppError> {
    state
        .verifier
        .verify(&email)
        .await
        .map(Json)
        .map_err(|e| AppError::dependency("Failed to verify email", e))
}
