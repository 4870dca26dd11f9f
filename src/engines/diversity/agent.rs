use super::context::PromptBuilder;
use super::pool::{assemble_pool, clamp_pool};
use super::retry::{RetryController, RetryOutcome};
use super::validator::SchemaCheck;
use crate::config::AgentConfig;
use crate::engines::statistics::{param_spread, recent_window};
use crate::error::{DivergenError, Result};
use crate::llm::LlmClient;
use crate::types::{DiversityOutcome, DiversityRequest};

/// LLM-backed diversity step for a multi-objective evolutionary loop
///
/// Asks the model for a replacement pool that spreads candidates across
/// parameter space, and guarantees a structurally valid result: either the
/// validated replacement or, once retries run out, the unchanged parent
/// pool. One pass makes between 1 and `max_retries` model calls, strictly
/// one at a time.
pub struct DiversityAgent<'a> {
    client: &'a dyn LlmClient,
    config: AgentConfig,
}

impl<'a> DiversityAgent<'a> {
    pub fn new(client: &'a dyn LlmClient, config: AgentConfig) -> Self {
        Self { client, config }
    }

    /// Run one diversity pass over the request
    ///
    /// The only surfaced error is a malformed request; every model-side
    /// failure resolves to `DiversityOutcome::Unchanged`.
    pub fn propose(&self, request: &DiversityRequest) -> Result<DiversityOutcome> {
        self.check_request(request)?;

        let window = recent_window(request.history_view(), self.config.most_recent);
        let spread = param_spread(&window);

        let prompt = PromptBuilder::new(request, spread.view(), &self.config).build();
        let check = SchemaCheck::new(request.pool_size(), request.n_vars());
        let mut controller =
            RetryController::new(self.client, check, prompt, self.config.max_retries);

        match controller.run() {
            RetryOutcome::Accepted(proposals) => {
                let mut pool = assemble_pool(&proposals, request.n_vars());
                if self.config.clamp_to_bounds {
                    let bounds = request.bounds.clone().unwrap_or_default();
                    clamp_pool(&mut pool, &bounds);
                }
                let rationales = proposals.into_iter().map(|p| p.rationale).collect();

                log::debug!(
                    "Accepted replacement pool after {} attempt(s)",
                    controller.attempts()
                );
                Ok(DiversityOutcome::Replaced { pool, rationales })
            }
            RetryOutcome::Exhausted { last_response } => {
                log::warn!(
                    "No valid reply in {} attempts; returning unchanged pool",
                    controller.attempts()
                );
                Ok(DiversityOutcome::Unchanged {
                    pool: request.parent_pool.clone(),
                    last_response,
                })
            }
        }
    }

    fn check_request(&self, request: &DiversityRequest) -> Result<()> {
        if request.pool_size() == 0 || request.n_vars() == 0 {
            return Err(DivergenError::InvalidRequest(
                "Parent pool must be non-empty".to_string(),
            ));
        }
        if request.parent_objectives.nrows() != request.pool_size() {
            return Err(DivergenError::InvalidRequest(format!(
                "Pool has {} rows but objectives have {}",
                request.pool_size(),
                request.parent_objectives.nrows()
            )));
        }
        if let Some(history) = &request.history {
            if history.ncols() != request.n_vars() {
                return Err(DivergenError::InvalidRequest(format!(
                    "History has {} columns but the pool has {} parameters",
                    history.ncols(),
                    request.n_vars()
                )));
            }
        }
        Ok(())
    }
}
