use super::traits::ConfigSection;
use crate::error::DivergenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Upper bound on model invocations per diversity pass
    pub max_retries: usize,
    /// Trailing history window used for spread statistics
    pub most_recent: usize,
    /// Advisory cap on parameters edited per candidate; instruction text only
    pub edit_budget: usize,
    /// Decimal precision of numbers rendered into the context
    pub decimals: usize,
    /// Row cap for pool/objective sections of the context
    pub max_rows: usize,
    /// Clamp accepted pools into bounds instead of trusting the model
    pub clamp_to_bounds: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            most_recent: 100,
            edit_budget: 2,
            decimals: 3,
            max_rows: 20,
            clamp_to_bounds: false,
        }
    }
}

impl ConfigSection for AgentConfig {
    fn section_name() -> &'static str {
        "agent"
    }

    fn validate(&self) -> Result<(), DivergenError> {
        if self.max_retries < 1 {
            return Err(DivergenError::Configuration(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.most_recent < 1 {
            return Err(DivergenError::Configuration(
                "most_recent must be at least 1".to_string(),
            ));
        }
        if self.max_rows < 1 {
            return Err(DivergenError::Configuration(
                "max_rows must be at least 1".to_string(),
            ));
        }
        if self.decimals > 12 {
            return Err(DivergenError::Configuration(
                "decimals must be at most 12".to_string(),
            ));
        }
        Ok(())
    }
}
