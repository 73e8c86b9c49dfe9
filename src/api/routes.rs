use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::generation::{generate_email_content, generate_message};
use super::health::health;
use super::mail::send_email;
use super::metrics::prometheus_metrics;
use super::options::email_options;
use super::template::{get_template, list_templates};
use super::verification::verify_email;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Mail
        .route("/send-email", post(send_email))
        .route("/verify-email/{email}", get(verify_email))
        .route("/email-options", get(email_options))
        // Templates
        .route("/email-templates", get(list_templates))
        .route("/email-templates/{filename}", get(get_template))
        // Generation
        .route("/generate-email-content", post(generate_email_content))
        .route("/api/message/generate", post(generate_message))
}
