use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// One edited candidate as proposed by the model
///
/// Extra fields in the reply are tolerated; only `values` and `rationale`
/// are required, and `values` must contain numbers only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedCandidate {
    pub values: Vec<f64>,
    pub rationale: String,
}

/// One side of a bounds pair: a single scalar or one value per parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundSide {
    Scalar(f64),
    PerParam(Vec<f64>),
}

impl BoundSide {
    pub fn min(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerParam(v) => v.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }

    pub fn max(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerParam(v) => v.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Bound for parameter `i`; None when a per-parameter vector is too short
    pub fn at(&self, i: usize) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerParam(v) => v.get(i).copied(),
        }
    }
}

/// Legal value range for every element of every candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: BoundSide,
    pub upper: BoundSide,
}

impl Bounds {
    pub fn scalar(lower: f64, upper: f64) -> Self {
        Self {
            lower: BoundSide::Scalar(lower),
            upper: BoundSide::Scalar(upper),
        }
    }

    pub fn unit() -> Self {
        Self::scalar(0.0, 1.0)
    }

    /// Collapsed `[min(lower), max(upper)]` summary shown to the model
    pub fn display_range(&self) -> String {
        format!("[{}, {}]", self.lower.min(), self.upper.max())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

/// Externally computed statistics bundle, consumed opaquely
///
/// The component never interprets these matrices; they are rendered into the
/// model context as-is.
#[derive(Debug, Clone)]
pub struct PoolSummary {
    pub param_param_corr: Array2<f64>,
    pub param_obj_corr: Array2<f64>,
    pub pca_loadings: Array2<f64>,
    pub pca_explained_variance: Array1<f64>,
}

/// Input to one diversity pass
#[derive(Debug, Clone)]
pub struct DiversityRequest {
    /// Current generation, shape (pool_size, n_vars)
    pub parent_pool: Array2<f64>,
    /// Objectives aligned by row with `parent_pool`, shape (pool_size, n_objs)
    pub parent_objectives: Array2<f64>,
    /// Full evaluation history; the parent pool stands in when absent
    pub history: Option<Array2<f64>>,
    /// Legal value range; the unit interval when absent
    pub bounds: Option<Bounds>,
    pub summary: PoolSummary,
}

impl DiversityRequest {
    pub fn pool_size(&self) -> usize {
        self.parent_pool.nrows()
    }

    pub fn n_vars(&self) -> usize {
        self.parent_pool.ncols()
    }

    pub fn n_objs(&self) -> usize {
        self.parent_objectives.ncols()
    }

    pub fn history_view(&self) -> ArrayView2<'_, f64> {
        self.history.as_ref().unwrap_or(&self.parent_pool).view()
    }

    pub fn bounds_display(&self) -> String {
        match &self.bounds {
            Some(b) => b.display_range(),
            None => "[0, 1]".to_string(),
        }
    }
}

/// Result of one diversity pass
///
/// Both variants carry a pool of the input shape, so the calling evolution
/// loop never has to special-case a failed pass.
#[derive(Debug, Clone)]
pub enum DiversityOutcome {
    /// The model supplied a structurally valid replacement pool
    Replaced {
        pool: Array2<f64>,
        rationales: Vec<String>,
    },
    /// Retries exhausted; the input pool passes through untouched
    Unchanged {
        pool: Array2<f64>,
        last_response: String,
    },
}

impl DiversityOutcome {
    pub fn pool(&self) -> &Array2<f64> {
        match self {
            Self::Replaced { pool, .. } => pool,
            Self::Unchanged { pool, .. } => pool,
        }
    }

    pub fn into_pool(self) -> Array2<f64> {
        match self {
            Self::Replaced { pool, .. } => pool,
            Self::Unchanged { pool, .. } => pool,
        }
    }

    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }

    pub fn rationales(&self) -> &[String] {
        match self {
            Self::Replaced { rationales, .. } => rationales,
            Self::Unchanged { .. } => &[],
        }
    }

    /// Raw text of the last model reply; only present after a failed pass
    pub fn last_response(&self) -> Option<&str> {
        match self {
            Self::Replaced { .. } => None,
            Self::Unchanged { last_response, .. } => Some(last_response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_display_scalar() {
        let b = Bounds::scalar(-1.5, 2.5);
        assert_eq!(b.display_range(), "[-1.5, 2.5]");
    }

    #[test]
    fn test_bounds_display_per_param() {
        let b = Bounds {
            lower: BoundSide::PerParam(vec![0.0, 0.2, 0.1]),
            upper: BoundSide::PerParam(vec![0.9, 1.0, 0.8]),
        };
        assert_eq!(b.display_range(), "[0, 1]");
    }

    #[test]
    fn test_bound_side_at() {
        let side = BoundSide::PerParam(vec![0.1, 0.2]);
        assert_eq!(side.at(1), Some(0.2));
        assert_eq!(side.at(5), None);
        assert_eq!(BoundSide::Scalar(3.0).at(7), Some(3.0));
    }
}
