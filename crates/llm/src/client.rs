//! Chat-completions HTTP client

use reqwest::Client;
use thiserror::Error;

use homedesk_config::LlmConfig;

use crate::prompt::Message;

/// Language-model call errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// OpenAI-compatible chat-completions client
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatClient {
    pub fn new(config: &LlmConfig) -> Self {
        if config.api_key.is_some() {
            tracing::info!(model = %config.model, "Chat client initialized with API key");
        } else {
            tracing::info!("Chat client created without API key, completions disabled");
        }

        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run one non-streaming completion and return the message text
    pub async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let auth_header = self
            .api_key
            .as_ref()
            .map(|k| format!("Bearer {}", k))
            .ok_or(LlmError::NotConfigured)?;

        let payload = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": messages,
        });

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", auth_header)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited);
            }

            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::rephrase_messages;

    fn unconfigured_client() -> ChatClient {
        ChatClient::new(&LlmConfig::default())
    }

    #[test]
    fn test_not_configured() {
        assert!(!unconfigured_client().is_configured());
    }

    #[tokio::test]
    async fn test_complete_without_key_fails_fast() {
        let client = unconfigured_client();
        let messages = rephrase_messages("HomeDesk", "greeting", None, "hi", "Hello!");

        match client.complete(&messages).await {
            Err(LlmError::NotConfigured) => {}
            other => panic!("expected NotConfigured, got {:?}", other.map(|_| ())),
        }
    }
}
