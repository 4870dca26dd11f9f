mod anthropic;
mod scripted;
mod types;

pub use anthropic::AnthropicClient;
pub use scripted::ScriptedClient;
pub use types::{ChatMessage, LlmClient, Role};
