//! Anthropic Messages API summarizer

use super::Summarizer;
use crate::config::SummarizerSettings;
use crate::error::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

const COLLABORATOR: &str = "summarizer";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Text used when the model returns no content blocks
pub const NO_RESPONSE: &str = "No response received.";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Summarizer backed by Claude over the plain HTTPS messages endpoint
pub struct ClaudeSummarizer {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl ClaudeSummarizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_settings(&SummarizerSettings::default(), api_key)
    }

    pub fn from_settings(settings: &SummarizerSettings, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            system_prompt: settings.system_prompt.clone(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> CollaboratorResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| CollaboratorError::unavailable(COLLABORATOR, "invalid API key"))?;
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Summarizer for ClaudeSummarizer {
    async fn summarize(&self, instruction: &str, table: &str) -> CollaboratorResult<String> {
        let url = format!("{}/messages", self.base_url);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &self.system_prompt,
            messages: vec![Message {
                role: "user",
                content: format!("{}\n\n{}", instruction, table),
            }],
        };

        debug!(model = %self.model, "Claude summary request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::unavailable(COLLABORATOR, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api {
                collaborator: COLLABORATOR,
                status,
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::unavailable(COLLABORATOR, e.to_string()))?;

        let text = body
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_request_shape_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "Summarize.\n\ncompany,released\nAcme,1 hours ago\n"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Acme raised a round."}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summarizer = ClaudeSummarizer::new("test-key").with_base_url(&server.uri());
        let text = summarizer
            .summarize("Summarize.", "company,released\nAcme,1 hours ago\n")
            .await
            .unwrap();
        assert_eq!(text, "Acme raised a round.");
    }

    #[tokio::test]
    async fn test_system_prompt_sent() {
        let server = MockServer::start().await;
        let settings = SummarizerSettings {
            system_prompt: "You are terse.".to_string(),
            ..Default::default()
        };
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"system": "You are terse."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
            .mount(&server)
            .await;

        let summarizer =
            ClaudeSummarizer::from_settings(&settings, "k").with_base_url(&server.uri());
        let text = summarizer.summarize("x", "y").await.unwrap();
        assert_eq!(text, NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .mount(&server)
            .await;

        let summarizer = ClaudeSummarizer::new("bad").with_base_url(&server.uri());
        let err = summarizer.summarize("x", "y").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Api { status: 401, .. }));
    }
}
