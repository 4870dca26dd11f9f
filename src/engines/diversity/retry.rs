use super::context::PromptBundle;
use super::validator::SchemaCheck;
use crate::llm::{ChatMessage, LlmClient};
use crate::types::ProposedCandidate;

/// Terminal result of the ask/validate loop
pub enum RetryOutcome {
    Accepted(Vec<ProposedCandidate>),
    Exhausted { last_response: String },
}

/// Phases of one diversity pass
enum Phase {
    Ask,
    Validate { raw: String },
    Accepted { proposals: Vec<ProposedCandidate> },
    Rejected { raw: String },
    Exhausted { raw: String },
}

/// Bounded ask/validate loop around the model
///
/// Every rejection appends one corrective warning to the instruction; the
/// context is never touched, so each attempt sees strictly more feedback
/// than the one before. The model is invoked at most `max_retries` times
/// and the calls are strictly sequential.
pub struct RetryController<'a> {
    client: &'a dyn LlmClient,
    check: SchemaCheck,
    instruction: String,
    context: String,
    warning: String,
    max_retries: usize,
    attempts: usize,
}

impl<'a> RetryController<'a> {
    pub fn new(
        client: &'a dyn LlmClient,
        check: SchemaCheck,
        prompt: PromptBundle,
        max_retries: usize,
    ) -> Self {
        let warning = format!(
            "\nWARNING: Your previous output was NOT a valid JSON array of {} objects \
             with \"values\" (length {}) and \"rationale\". \
             The first line must be ONLY that JSON array. Try again.",
            check.pool_size(),
            check.n_vars()
        );

        Self {
            client,
            check,
            instruction: prompt.instruction,
            context: prompt.context,
            warning,
            max_retries,
            attempts: 0,
        }
    }

    /// Model invocations made so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Current instruction, including any accumulated warnings
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Drive the machine to a terminal phase
    pub fn run(&mut self) -> RetryOutcome {
        let mut phase = Phase::Ask;
        loop {
            phase = match phase {
                Phase::Ask => self.ask(),
                Phase::Validate { raw } => self.validate(raw),
                Phase::Rejected { raw } => self.rejected(raw),
                Phase::Accepted { proposals } => return RetryOutcome::Accepted(proposals),
                Phase::Exhausted { raw } => {
                    return RetryOutcome::Exhausted { last_response: raw }
                }
            };
        }
    }

    fn ask(&mut self) -> Phase {
        self.attempts += 1;
        let conversation = [
            ChatMessage::system(self.instruction.clone()),
            ChatMessage::user(self.context.clone()),
        ];

        match self.client.complete(&conversation) {
            Ok(raw) => Phase::Validate { raw },
            Err(e) => {
                log::warn!("LLM call failed on attempt {}: {}", self.attempts, e);
                // A transport failure consumes the attempt like an empty reply
                Phase::Validate { raw: String::new() }
            }
        }
    }

    fn validate(&mut self, raw: String) -> Phase {
        match self.check.run(&raw) {
            Ok(proposals) => Phase::Accepted { proposals },
            Err(invalid) => {
                log::debug!("Reply rejected on attempt {}: {}", self.attempts, invalid);
                Phase::Rejected { raw }
            }
        }
    }

    fn rejected(&mut self, raw: String) -> Phase {
        if self.attempts >= self.max_retries {
            Phase::Exhausted { raw }
        } else {
            self.instruction.push_str(&self.warning);
            Phase::Ask
        }
    }
}
