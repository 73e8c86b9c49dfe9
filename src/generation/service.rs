use std::sync::Arc;

use serde::Serialize;

use super::content::{extract_content, CONTENT_TONE};
use super::gemini::GenerativeModel;
use super::history::MessageLog;
use super::types::{GeneratedContent, GeneratedMessage, GenerationError, MessageRequest};
use crate::error::AppError;
use crate::metrics::GenerationMetrics;

/// Recipient type used for `/generate-email-content` drafts
pub const CONTENT_RECIPIENT: &str = "customer";

/// Prompts the model and records every answer.
pub struct MessageService {
    model: Arc<dyn GenerativeModel>,
    log: Arc<dyn MessageLog>,
}

impl MessageService {
    pub fn new(model: Arc<dyn GenerativeModel>, log: Arc<dyn MessageLog>) -> Self {
        Self { model, log }
    }

    /// Generate a message and append it to the log. A failed append fails the call.
    pub async fn generate_message(&self, request: &MessageRequest) -> Result<String, GenerationError> {
        let result = self.generate_and_record(request).await;
        GenerationMetrics::record(result.is_ok());
        result
    }

    async fn generate_and_record(&self, request: &MessageRequest) -> Result<String, GenerationError> {
        let prompt = request.prompt();
        let response = self.model.generate(&prompt).await?;

        let record = GeneratedMessage::new(request, prompt, response);
        self.log.append(&record).await?;

        tracing::info!(
            message_id = %record.id,
            tone = %record.tone,
            recipient_type = %record.recipient_type,
            "Message generated"
        );
        Ok(record.response)
    }

    /// Friendly customer draft for `purpose`, split into subject and body
    pub async fn generate_content(&self, purpose: &str) -> Result<GeneratedContent, GenerationError> {
        let request = MessageRequest::new(CONTENT_RECIPIENT, CONTENT_TONE, purpose);
        let text = self.generate_message(&request).await?;
        Ok(extract_content(&text))
    }
}

/// Success body of `/api/message/generate`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub response: String,
}

/// Success body of `/generate-email-content`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub success: bool,
    pub generated_content: GeneratedContent,
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::dependency("Failed to generate email content", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{MemoryMessageLog, MessageLogError, ModelError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeModel {
        reply: String,
        fail: bool,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerativeModel for FakeModel {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                return Err(ModelError::Api {
                    status: 503,
                    message: "overloaded".into(),
                });
            }
            Ok(self.reply.clone())
        }
    }

    struct BrokenLog;

    #[async_trait]
    impl MessageLog for BrokenLog {
        async fn append(&self, _message: &GeneratedMessage) -> Result<(), MessageLogError> {
            Err(MessageLogError::Unavailable("disk full".into()))
        }
    }

    fn model(reply: &str) -> Arc<FakeModel> {
        Arc::new(FakeModel {
            reply: reply.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_generate_message_records_history() {
        let model = model("Hello!");
        let log = Arc::new(MemoryMessageLog::new());
        let service = MessageService::new(model.clone(), log.clone());

        let request = MessageRequest::new("manager", "formal", "a day off");
        let text = service.generate_message(&request).await.unwrap();

        assert_eq!(text, "Hello!");
        assert_eq!(
            model.prompts.lock().unwrap()[0],
            "Write a formal email to a manager about a day off."
        );

        let stored = log.messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].recipient_type, "manager");
        assert_eq!(stored[0].purpose, "a day off");
        assert_eq!(stored[0].prompt, "Write a formal email to a manager about a day off.");
        assert_eq!(stored[0].response, "Hello!");
    }

    #[tokio::test]
    async fn test_model_failure_records_nothing() {
        let model = Arc::new(FakeModel {
            fail: true,
            ..Default::default()
        });
        let log = Arc::new(MemoryMessageLog::new());
        let service = MessageService::new(model, log.clone());

        let err = service
            .generate_message(&MessageRequest::new("a", "b", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Model(_)));
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_log_failure_fails_generation() {
        let service = MessageService::new(model("Hello!"), Arc::new(BrokenLog));
        let err = service
            .generate_message(&MessageRequest::new("a", "b", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Log(_)));
    }

    #[tokio::test]
    async fn test_generate_content_uses_friendly_customer_prompt() {
        let model = model("Subject: Team Sync\nLet's meet.");
        let log = Arc::new(MemoryMessageLog::new());
        let service = MessageService::new(model.clone(), log.clone());

        let content = service.generate_content("a weekly sync").await.unwrap();

        assert_eq!(
            model.prompts.lock().unwrap()[0],
            "Write a friendly email to a customer about a weekly sync."
        );
        assert_eq!(content.subject, "Team Sync");
        assert_eq!(content.message, "Let's meet.");
        assert_eq!(content.word_count, 2);
        assert_eq!(log.len(), 1);
    }
}
