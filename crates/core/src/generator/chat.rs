//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the raw text of the first completion choice.
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError>;
}

pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiChatClient {
    pub fn new(config: &LlmConfig, api_key: SecretString) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::RequestFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponseMessage {
    content: Option<String>,
}

fn content_from_response(body: &str) -> Result<String, GenerationError> {
    let resp: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse {
            reason: format!("JSON parse error: {}", e),
        })?;

    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or(GenerationError::EmptyContent)
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, GenerationError> {
        let url = self.api_url();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!("Sending chat completion request: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::debug!("Chat completion response status: {}", status);

        if !status.is_success() {
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        content_from_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_chat_shape() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            max_tokens: 150,
            temperature: 0.5,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "m");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hi");
        assert_eq!(v["max_tokens"], 150);
    }

    #[test]
    fn reads_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"roasted"}}]}"#;
        assert_eq!(content_from_response(body).unwrap(), "roasted");
    }

    #[test]
    fn missing_choices_is_empty_content() {
        let err = content_from_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyContent));
    }

    #[test]
    fn garbage_is_invalid_response() {
        let err = content_from_response("<html>").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse { .. }));
    }
}
