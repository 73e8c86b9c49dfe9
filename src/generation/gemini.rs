//! Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::types::ModelError;
use crate::config::GenerationConfig;

/// Text returned when the model answers with no candidate text
pub const EMPTY_RESPONSE: &str = "No response.";

/// A model that turns one prompt into one block of text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap, ModelError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key =
            HeaderValue::from_str(&self.api_key).map_err(|_| ModelError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            ModelError::InvalidResponse(format!("Failed to parse response: {}", e.without_url()))
        })?;

        Ok(parsed
            .first_text()
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&GenerationConfig {
            api_key: "gemini-key".to_string(),
            base_url: server.url("/v1beta"),
            model: "gemini-1.5-flash".to_string(),
            http_timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_with_key_header() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-1.5-flash:generateContent")
                    .header("x-goog-api-key", "gemini-key")
                    .json_body(json!({"contents": [{"parts": [{"text": "Write something."}]}]}));
                then.status(200).json_body(json!({
                    "candidates": [
                        {"content": {"parts": [{"text": "Subject: Hi\nHello there"}], "role": "model"}}
                    ]
                }));
            })
            .await;

        let text = client_for(&server).generate("Write something.").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Subject: Hi\nHello there");
    }

    #[tokio::test]
    async fn test_missing_candidates_fall_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({"candidates": []}));
            })
            .await;

        let text = client_for(&server).generate("x").await.unwrap();
        assert_eq!(text, EMPTY_RESPONSE);
    }

    #[tokio::test]
    async fn test_candidate_without_parts_falls_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200)
                    .json_body(json!({"candidates": [{"finishReason": "SAFETY"}]}));
            })
            .await;

        let text = client_for(&server).generate("x").await.unwrap();
        assert_eq!(text, EMPTY_RESPONSE);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("quota exceeded");
            })
            .await;

        let err = client_for(&server).generate("x").await.unwrap_err();
        assert!(matches!(err, ModelError::Api { status: 429, ref message } if message == "quota exceeded"));
    }
}
