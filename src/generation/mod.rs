//! Email copy generation.
//!
//! Prompts a Gemini model, records each prompt/response pair in an
//! append-only log, and splits drafts into subject and body.

mod content;
mod gemini;
mod history;
mod service;
mod types;

pub use content::{extract_content, split_subject, word_count, CONTENT_TONE, DEFAULT_SUBJECT};
pub use gemini::{GeminiClient, GenerativeModel, EMPTY_RESPONSE};
pub use history::{MemoryMessageLog, MessageLog, PostgresMessageLog};
pub use service::{ContentResponse, MessageResponse, MessageService, CONTENT_RECIPIENT};
pub use types::{
    ContentRequest, GeneratedContent, GeneratedMessage, GenerationError, MessageLogError,
    MessageRequest, ModelError,
};
