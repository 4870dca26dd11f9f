pub mod agent;
pub mod llm;
pub mod manager;
pub mod traits;

pub use agent::AgentConfig;
pub use llm::LlmConfig;
pub use manager::{AppConfig, ConfigManager};
