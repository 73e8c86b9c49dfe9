//! Template listing and raw content endpoints.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{AppError, FieldError};
use crate::server::AppState;
use crate::template::{TemplateError, TemplateListing};

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(_) => AppError::NotFound("Template not found".into()),
            TemplateError::InvalidName(name) => AppError::Validation(vec![FieldError {
                message: format!("invalid template name: {}", name),
                field: "filename".to_string(),
                location: "params".to_string(),
            }]),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// GET /email-templates - Category tree of template filenames
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListing> {
    Json(state.templates.list())
}

/// GET /email-templates/{filename} - Stored template JSON, unmodified
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let raw = state.templates.raw(&filename)?.to_string();
    Ok(([(header::CONTENT_TYPE, "application/json")], raw))
}
