use super::traits::ConfigSection;
use crate::error::DivergenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
    pub timeout_secs: u64,
    /// Name of the env var holding the API key
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            temperature: 1.0,
            max_tokens: 4096,
            timeout_secs: 120,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

impl ConfigSection for LlmConfig {
    fn section_name() -> &'static str {
        "llm"
    }

    fn validate(&self) -> Result<(), DivergenError> {
        if self.api_url.is_empty() {
            return Err(DivergenError::Configuration(
                "api_url must not be empty".to_string(),
            ));
        }
        if self.temperature < 0.0 || self.temperature > 1.0 {
            return Err(DivergenError::Configuration(
                "temperature must be between 0 and 1".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(DivergenError::Configuration(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(DivergenError::Configuration(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
