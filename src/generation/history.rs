//! Append-only log of generated messages.
//!
//! Two implementations share the `MessageLog` trait:
//! - `PostgresMessageLog` for deployments
//! - `MemoryMessageLog` for tests and local runs

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;

use super::types::{GeneratedMessage, MessageLogError};

#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Store one generated message. Records are never updated or removed.
    async fn append(&self, message: &GeneratedMessage) -> Result<(), MessageLogError>;
}

/// PostgreSQL-backed log.
///
/// Table structure:
/// - `generated_messages` - one row per generation, keyed by UUID
pub struct PostgresMessageLog {
    pool: PgPool,
}

impl PostgresMessageLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), MessageLogError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS generated_messages (
                id UUID PRIMARY KEY,
                recipient_type TEXT NOT NULL,
                tone TEXT NOT NULL,
                purpose TEXT NOT NULL,
                prompt TEXT NOT NULL,
                response TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_generated_messages_created_at ON generated_messages (created_at)",
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("generated_messages schema ready");
        Ok(())
    }
}

#[async_trait]
impl MessageLog for PostgresMessageLog {
    async fn append(&self, message: &GeneratedMessage) -> Result<(), MessageLogError> {
        sqlx::query(
            r#"
            INSERT INTO generated_messages (id, recipient_type, tone, purpose, prompt, response, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(&message.recipient_type)
        .bind(&message.tone)
        .bind(&message.purpose)
        .bind(&message.prompt)
        .bind(&message.response)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(message_id = %message.id, "Generated message stored");
        Ok(())
    }
}

/// In-process log; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMessageLog {
    messages: Mutex<Vec<GeneratedMessage>>,
}

impl MemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored messages in insertion order
    pub fn messages(&self) -> Vec<GeneratedMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageLog for MemoryMessageLog {
    async fn append(&self, message: &GeneratedMessage) -> Result<(), MessageLogError> {
        self.messages
            .lock()
            .map_err(|e| MessageLogError::Unavailable(e.to_string()))?
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MessageRequest;

    #[tokio::test]
    async fn test_memory_log_appends_in_order() {
        let log = MemoryMessageLog::new();
        let request = MessageRequest::new("customer", "friendly", "launch");

        let first = GeneratedMessage::new(&request, request.prompt(), "one".into());
        let second = GeneratedMessage::new(&request, request.prompt(), "two".into());
        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let stored = log.messages();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0], first);
        assert_eq!(stored[1].response, "two");
        assert_ne!(stored[0].id, stored[1].id);
    }
}
