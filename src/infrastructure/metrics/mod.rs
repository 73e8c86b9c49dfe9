//! Prometheus metrics for the gateway.
//!
//! - Mail metrics (sent, failed, previews)
//! - Template inventory and lookup metrics
//! - Verification and generation call outcomes
//! - Rate limiting metrics

mod helpers;

pub use helpers::{
    encode_metrics, GenerationMetrics, MailMetrics, RateLimitMetrics, TemplateMetrics,
    VerificationMetrics,
};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec,
    IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "mailgw";

lazy_static! {
    // ============================================================================
    // Mail Metrics
    // ============================================================================

    /// Emails accepted by the SMTP transport
    pub static ref EMAILS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_sent_total", METRIC_PREFIX),
        "Total emails accepted by the SMTP transport"
    ).unwrap();

    /// Emails the SMTP transport rejected or failed to deliver
    pub static ref EMAILS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_failed_total", METRIC_PREFIX),
        "Total emails the SMTP transport failed to send"
    ).unwrap();

    /// Compose links returned instead of sending
    pub static ref EMAIL_PREVIEWS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_email_previews_total", METRIC_PREFIX),
        "Total compose links returned instead of sending"
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template files held in memory
    pub static ref TEMPLATES_LOADED: IntGauge = register_int_gauge!(
        format!("{}_templates_loaded", METRIC_PREFIX),
        "Number of template files loaded at startup"
    ).unwrap();

    /// Template lookups by result (found, not_found, invalid)
    pub static ref TEMPLATE_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_lookups_total", METRIC_PREFIX),
        "Total template lookups by result",
        &["result"]
    ).unwrap();

    // ============================================================================
    // External API Metrics
    // ============================================================================

    /// Address verifications by result (ok, error)
    pub static ref VERIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_verifications_total", METRIC_PREFIX),
        "Total address verification calls by result",
        &["result"]
    ).unwrap();

    /// Content generations by result (ok, error)
    pub static ref GENERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_generations_total", METRIC_PREFIX),
        "Total content generation calls by result",
        &["result"]
    ).unwrap();

    // ============================================================================
    // Rate Limit Metrics
    // ============================================================================

    pub static ref RATELIMIT_ALLOWED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_ratelimit_allowed_total", METRIC_PREFIX),
        "Total requests allowed by the rate limiter"
    ).unwrap();

    /// Client buckets currently tracked
    pub static ref RATELIMIT_BUCKETS: IntGauge = register_int_gauge!(
        format!("{}_ratelimit_buckets", METRIC_PREFIX),
        "Number of client buckets held by the rate limiter"
    ).unwrap();

    pub static ref RATELIMIT_DENIED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_ratelimit_denied_total", METRIC_PREFIX),
        "Total requests denied by the rate limiter"
    ).unwrap();
}
