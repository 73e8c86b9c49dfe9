//! Hunter email-verifier client

use std::time::Duration;

use async_trait::async_trait;

use super::types::{
    VerificationError, VerificationReport, VerificationResult, VerifierEnvelope,
};
use crate::config::VerificationConfig;
use crate::metrics::VerificationMetrics;

/// Looks up deliverability information for one address.
#[async_trait]
pub trait EmailVerifier: Send + Sync {
    async fn verify(&self, email: &str) -> VerificationResult<VerificationReport>;
}

pub struct HunterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HunterClient {
    pub fn new(config: &VerificationConfig) -> VerificationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn lookup(&self, email: &str) -> VerificationResult<VerificationReport> {
        let response = self
            .client
            .get(format!("{}/email-verifier", self.base_url))
            .query(&[("email", email), ("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VerificationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: VerifierEnvelope = response.json().await.map_err(|e| {
            VerificationError::InvalidResponse(e.without_url().to_string())
        })?;

        Ok(VerificationReport::from_record(envelope.data))
    }
}

#[async_trait]
impl EmailVerifier for HunterClient {
    async fn verify(&self, email: &str) -> VerificationResult<VerificationReport> {
        let result = self.lookup(email).await;
        VerificationMetrics::record(result.is_ok());

        match &result {
            Ok(report) => tracing::debug!(
                status = ?report.status,
                safe_to_send = report.safe_to_send,
                "Address verified"
            ),
            Err(e) => tracing::warn!(error = %e, "Address verification failed"),
        }
        result
    }
}
