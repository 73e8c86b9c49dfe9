use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

/// Score a valid address must strictly exceed to be considered safe
pub const SAFE_SCORE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// Transport failure; the request URL (which carries the API key) is stripped.
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Verification API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for VerificationError {
    fn from(err: reqwest::Error) -> Self {
        VerificationError::Http(err.without_url().to_string())
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;

/// `data` object of the email-verifier response; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifierRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<Number>,
    #[serde(default)]
    pub disposable: Option<bool>,
    #[serde(default)]
    pub webmail: Option<bool>,
    #[serde(default)]
    pub smtp_check: Option<bool>,
    #[serde(default)]
    pub mx_records: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifierEnvelope {
    pub data: VerifierRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationDetails {
    pub disposable: Option<bool>,
    pub webmail: Option<bool>,
    pub smtp_check: Option<bool>,
    pub mx_records: Option<bool>,
}

/// What `/verify-email` returns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub score: Option<Number>,
    pub status: Option<String>,
    pub details: VerificationDetails,
    pub safe_to_send: bool,
}

impl VerificationReport {
    /// Valid means status is exactly `"valid"`; safe additionally needs a score above 50.
    pub fn from_record(record: VerifierRecord) -> Self {
        let is_valid = record.status.as_deref() == Some("valid");
        let above_threshold = record
            .score
            .as_ref()
            .and_then(Number::as_f64)
            .is_some_and(|score| score > SAFE_SCORE_THRESHOLD);

        Self {
            is_valid,
            safe_to_send: is_valid && above_threshold,
            score: record.score,
            status: record.status,
            details: VerificationDetails {
                disposable: record.disposable,
                webmail: record.webmail,
                smtp_check: record.smtp_check,
                mx_records: record.mx_records,
            },
        }
    }
}
