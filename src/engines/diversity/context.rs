use crate::config::AgentConfig;
use crate::types::DiversityRequest;
use crate::utils::array_format::{matrix_to_str, vector_to_str};
use ndarray::ArrayView1;

/// Instruction + context pair sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct PromptBundle {
    pub instruction: String,
    pub context: String,
}

/// Deterministic renderer of the system instruction and user context
///
/// Identical inputs produce byte-identical output; the retry loop relies on
/// this when it re-sends the context with an extended instruction.
pub struct PromptBuilder<'a> {
    request: &'a DiversityRequest,
    spread: ArrayView1<'a, f64>,
    config: &'a AgentConfig,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(
        request: &'a DiversityRequest,
        spread: ArrayView1<'a, f64>,
        config: &'a AgentConfig,
    ) -> Self {
        Self {
            request,
            spread,
            config,
        }
    }

    pub fn build(&self) -> PromptBundle {
        PromptBundle {
            instruction: self.instruction(),
            context: self.context(),
        }
    }

    /// System message: role, data legend, guidelines, strict output format
    pub fn instruction(&self) -> String {
        let n_vars = self.request.n_vars();
        let n_objs = self.request.n_objs();
        let pool_size = self.request.pool_size();
        let bounds_str = self.request.bounds_display();

        let mut s = String::new();
        s.push_str("You are a diversity agent for a multi-objective evolutionary algorithm.\n\n");
        s.push_str("Your task:\n");
        s.push_str(
            "- Make edits to the current sets in the pool that increase exploration while respecting bounds.\n",
        );
        s.push_str(
            "- Focus on spreading values in parameters with low diversity and stabilizing those with very high diversity.\n",
        );
        s.push_str("- Avoid collapsing parameters to extremes (0 or max).\n\n");
        s.push_str("Problem summary:\n");
        s.push_str(&format!(
            "- Each candidate has {} parameters (σ_k per dataset).\n",
            n_vars
        ));
        s.push_str(&format!(
            "- Each solution yields {} objectives (RMS errors e_k, lower is better).\n\n",
            n_objs
        ));
        s.push_str("Provided data you can use:\n");
        s.push_str("1) Full parent pool and objectives (current generation).\n");
        s.push_str(&format!(
            "2) The statistics for the most recent {} sets.\n",
            self.config.most_recent
        ));
        s.push_str("   • Diversity scores per parameter computed from the recent candidates.\n");
        s.push_str("   • Array of length n_vars (index i → σ_i).\n");
        s.push_str("   • Each score measures spread of σ values across the pool.\n");
        s.push_str("   • Low score = values clustered → encourage exploration.\n");
        s.push_str("   • High score = values spread → encourage refinement/stabilization.\n");
        s.push_str("   • Use these scores to decide which σ to perturb and by how much.\n");
        s.push_str("3) Parameter–parameter correlation (matrix) of the history pool.\n");
        s.push_str("   • Positive correlation: σ_i and σ_j move together.\n");
        s.push_str("   • Negative correlation: σ_i and σ_j trade off.\n");
        s.push_str("   • Use to design consistent edits across correlated parameters.\n");
        s.push_str("4) Parameter–objective correlation of the history pool.\n");
        s.push_str("   • How each σ dimension influences each objective.\n");
        s.push_str("5) PCA loadings + explained variance.\n");
        s.push_str("   • Use early PCs (high variance) to guide exploration directions.\n");
        s.push_str(&format!(
            "6) Bounds reminder: all σ must remain inside {}.\n",
            bounds_str
        ));
        s.push_str(&format!(
            "7) Edit budget: at most {} parameters may be shifted in each new set.\n\n",
            self.config.edit_budget
        ));
        s.push_str("Guidelines:\n");
        s.push_str("- Inject diversity by perturbing clustered parameters.\n");
        s.push_str("- Spread out solutions across unexplored parameter space.\n");
        s.push_str("- Prioritize exploration over exploitation.\n\n");
        s.push_str("Output format (STRICT):\n");
        s.push_str(&format!(
            "- Return a valid JSON array of {} objects.\n",
            pool_size
        ));
        s.push_str(&format!(
            "- Each object must have \"values\" (an array of {} numbers) and \"rationale\" (short text).\n",
            n_vars
        ));
        s.push_str("- The FIRST LINE of your reply must be ONLY that JSON array, no extra text.");
        s
    }

    /// User message: indexed data sections plus closing instructions
    pub fn context(&self) -> String {
        let n_vars = self.request.n_vars();
        let n_objs = self.request.n_objs();
        let decimals = self.config.decimals;
        let max_rows = Some(self.config.max_rows);
        let summary = &self.request.summary;

        let mut s = String::new();
        s.push_str("==== Indexing & Semantics ====\n");
        s.push_str(&format!(
            "• Parameters: 0..{} (σ_k per dataset).\n",
            n_vars.saturating_sub(1)
        ));
        s.push_str(&format!(
            "• Objectives: 0..{} (RMS error, lower = better).\n\n",
            n_objs.saturating_sub(1)
        ));
        s.push_str("==== Current Parent Pool (parameters) ====\n");
        s.push_str(&matrix_to_str(
            &self.request.parent_pool.view(),
            decimals,
            max_rows,
        ));
        s.push_str("\n\n==== Current Parent Objectives ====\n");
        s.push_str(&matrix_to_str(
            &self.request.parent_objectives.view(),
            decimals,
            max_rows,
        ));
        s.push_str("\n\n==== Global Diversity per Parameter (from most recent candidates) ====\n");
        s.push_str(&vector_to_str(&self.spread, decimals));
        s.push_str("\n\n==== Param–Param Correlation ====\n");
        s.push_str(&matrix_to_str(
            &summary.param_param_corr.view(),
            decimals,
            None,
        ));
        s.push_str("\n\n==== Param–Objective Correlation ====\n");
        s.push_str(&matrix_to_str(&summary.param_obj_corr.view(), decimals, None));
        s.push_str("\n\n==== PCA Loadings + Explained Variance ====\n");
        s.push_str(&matrix_to_str(&summary.pca_loadings.view(), decimals, None));
        s.push('\n');
        s.push_str(&vector_to_str(
            &summary.pca_explained_variance.view(),
            decimals,
        ));
        s.push_str("\n\nInstructions:\n");
        s.push_str("- Expand diversity in globally clustered parameters.\n");
        s.push_str("- Stabilize extreme variation in globally high-diversity parameters.\n");
        s.push_str("- Keep all σ inside bounds.\n");
        s.push_str(&format!(
            "- Adjust at most {} parameters per set.\n",
            self.config.edit_budget
        ));
        s.push_str(
            "- Output must cover the whole pool (each object corresponds to one candidate).\n",
        );
        s
    }
}
