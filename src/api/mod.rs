//! API layer - HTTP endpoint handlers organized by domain.

mod generation;
mod health;
mod mail;
mod metrics;
mod options;
mod routes;
mod template;
mod verification;

pub use generation::{generate_email_content, generate_message};
pub use health::{health, HealthResponse};
pub use mail::{send_email, SENT_MESSAGE};
pub use metrics::prometheus_metrics;
pub use options::email_options;
pub use routes::api_routes;
pub use template::{get_template, list_templates};
pub use verification::verify_email;
