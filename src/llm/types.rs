use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Message role in a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in an ordered conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// A blocking chat-completion capability
///
/// Implementations may be slow and nondeterministic and may return text in
/// any shape; callers must validate the reply themselves. Exactly one call
/// is in flight at a time per caller.
pub trait LlmClient: Send + Sync {
    /// Send the ordered conversation and return the raw completion text
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
