use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from the generative model client.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport failure with the request URL stripped
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Model API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.without_url().to_string())
    }
}

/// Errors from the generation history store.
#[derive(Debug, Error)]
pub enum MessageLogError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Message log unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to record generated message: {0}")]
    Log(#[from] MessageLogError),
}

/// One prompt/response pair, appended once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMessage {
    pub id: Uuid,
    pub recipient_type: String,
    pub tone: String,
    pub purpose: String,
    pub prompt: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedMessage {
    pub fn new(request: &MessageRequest, prompt: String, response: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_type: request.recipient_type.clone(),
            tone: request.tone.clone(),
            purpose: request.purpose.clone(),
            prompt,
            response,
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /api/message/generate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageRequest {
    pub recipient_type: String,
    pub tone: String,
    pub purpose: String,
}

impl MessageRequest {
    pub fn new(
        recipient_type: impl Into<String>,
        tone: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            recipient_type: recipient_type.into(),
            tone: tone.into(),
            purpose: purpose.into(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Write a {} email to a {} about {}.",
            self.tone, self.recipient_type, self.purpose
        )
    }
}

/// Body of `POST /generate-email-content`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentRequest {
    pub prompt: String,
}

/// Subject and body split out of a generated draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub subject: String,
    pub message: String,
    pub tone: String,
    pub word_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_wording() {
        let request = MessageRequest::new("customer", "friendly", "a product launch");
        assert_eq!(
            request.prompt(),
            "Write a friendly email to a customer about a product launch."
        );
    }

    #[test]
    fn test_message_request_reads_camel_case() {
        let request: MessageRequest = serde_json::from_value(json!({
            "recipientType": "manager",
            "tone": "formal",
            "purpose": "leave request"
        }))
        .unwrap();
        assert_eq!(request.recipient_type, "manager");
    }

    #[test]
    fn test_generated_message_wire_names() {
        let request = MessageRequest::new("customer", "friendly", "launch");
        let message = GeneratedMessage::new(&request, request.prompt(), "Hi".into());
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["recipientType"], "customer");
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["response"], "Hi");
    }
}
