//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    EMAILS_FAILED_TOTAL, EMAILS_SENT_TOTAL, EMAIL_PREVIEWS_TOTAL, GENERATIONS_TOTAL,
    RATELIMIT_ALLOWED_TOTAL, RATELIMIT_DENIED_TOTAL, TEMPLATE_LOOKUPS_TOTAL, VERIFICATIONS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording mail metrics
pub struct MailMetrics;

impl MailMetrics {
    pub fn record_sent() {
        EMAILS_SENT_TOTAL.inc();
    }

    pub fn record_failed() {
        EMAILS_FAILED_TOTAL.inc();
    }

    pub fn record_preview() {
        EMAIL_PREVIEWS_TOTAL.inc();
    }
}

/// Helper struct for recording template lookups
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn record_found() {
        TEMPLATE_LOOKUPS_TOTAL.with_label_values(&["found"]).inc();
    }

    pub fn record_not_found() {
        TEMPLATE_LOOKUPS_TOTAL.with_label_values(&["not_found"]).inc();
    }

    pub fn record_invalid() {
        TEMPLATE_LOOKUPS_TOTAL.with_label_values(&["invalid"]).inc();
    }
}

pub struct VerificationMetrics;

impl VerificationMetrics {
    pub fn record(ok: bool) {
        let label = if ok { "ok" } else { "error" };
        VERIFICATIONS_TOTAL.with_label_values(&[label]).inc();
    }
}

pub struct GenerationMetrics;

impl GenerationMetrics {
    pub fn record(ok: bool) {
        let label = if ok { "ok" } else { "error" };
        GENERATIONS_TOTAL.with_label_values(&[label]).inc();
    }
}

/// Helper struct for recording rate limit metrics
pub struct RateLimitMetrics;

impl RateLimitMetrics {
    pub fn record_allowed() {
        RATELIMIT_ALLOWED_TOTAL.inc();
    }

    pub fn record_denied() {
        RATELIMIT_DENIED_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_registered_counters() {
        MailMetrics::record_preview();
        TemplateMetrics::record_found();

        let output = encode_metrics().unwrap();
        assert!(output.contains("mailgw_email_previews_total"));
        assert!(output.contains("mailgw_template_lookups_total"));
    }
}
