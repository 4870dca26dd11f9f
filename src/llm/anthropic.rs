use super::types::{ChatMessage, LlmClient, Role};
use crate::config::LlmConfig;
use crate::error::{DivergenError, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Blocking client for an Anthropic-style messages endpoint
///
/// System-role messages are folded into the request's top-level `system`
/// field; the remaining messages form the `messages` array.
pub struct AnthropicClient {
    http: reqwest::blocking::Client,
    config: LlmConfig,
    api_key: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            api_key: api_key.into(),
        })
    }

    /// Read the API key from the env var named in the config
    pub fn from_env(config: LlmConfig) -> Result<Self> {
        let key = std::env::var(&config.api_key_env).map_err(|_| {
            DivergenError::Configuration(format!("{} is not set", config.api_key_env))
        })?;
        Self::new(config, key)
    }
}

impl LlmClient for AnthropicClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let system: String = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let user_messages: Vec<_> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| json!({"role": "user", "content": m.content}))
            .collect();

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system,
            "messages": user_messages,
        });

        let resp = self
            .http
            .post(self.config.api_url.as_str())
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            let excerpt = &text[..text.len().min(500)];
            return Err(DivergenError::Llm(format!("API error {}: {}", status, excerpt)));
        }

        let data: MessagesResponse = resp.json()?;

        data.content
            .first()
            .and_then(|b| b.text.clone())
            .ok_or_else(|| DivergenError::Llm("Empty response".to_string()))
    }
}
