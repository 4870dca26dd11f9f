use crate::types::{Bounds, ProposedCandidate};
use ndarray::Array2;

/// Stack validated proposals into a pool matrix, in response order
///
/// Arity is guaranteed by the schema check, so this cannot fail.
pub fn assemble_pool(proposals: &[ProposedCandidate], n_vars: usize) -> Array2<f64> {
    let mut pool = Array2::zeros((proposals.len(), n_vars));
    for (i, proposal) in proposals.iter().enumerate() {
        for (j, value) in proposal.values.iter().take(n_vars).enumerate() {
            pool[[i, j]] = *value;
        }
    }
    pool
}

/// Clamp every candidate into bounds, parameter by parameter
///
/// Parameters a per-parameter bound vector does not cover are left as-is.
pub fn clamp_pool(pool: &mut Array2<f64>, bounds: &Bounds) {
    for j in 0..pool.ncols() {
        let lo = bounds.lower.at(j);
        let hi = bounds.upper.at(j);
        for value in pool.column_mut(j).iter_mut() {
            if let Some(lo) = lo {
                if *value < lo {
                    *value = lo;
                }
            }
            if let Some(hi) = hi {
                if *value > hi {
                    *value = hi;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundSide;
    use ndarray::arr2;

    fn proposal(values: &[f64]) -> ProposedCandidate {
        ProposedCandidate {
            values: values.to_vec(),
            rationale: "test".to_string(),
        }
    }

    #[test]
    fn test_assemble_preserves_response_order() {
        let proposals = vec![proposal(&[0.1, 0.2]), proposal(&[0.3, 0.4])];
        let pool = assemble_pool(&proposals, 2);
        assert_eq!(pool, arr2(&[[0.1, 0.2], [0.3, 0.4]]));
    }

    #[test]
    fn test_clamp_scalar_bounds() {
        let mut pool = arr2(&[[-0.5, 0.5], [1.5, 0.2]]);
        clamp_pool(&mut pool, &Bounds::scalar(0.0, 1.0));
        assert_eq!(pool, arr2(&[[0.0, 0.5], [1.0, 0.2]]));
    }

    #[test]
    fn test_clamp_per_param_bounds() {
        let mut pool = arr2(&[[0.05, 0.95]]);
        let bounds = Bounds {
            lower: BoundSide::PerParam(vec![0.1, 0.0]),
            upper: BoundSide::PerParam(vec![1.0, 0.9]),
        };
        clamp_pool(&mut pool, &bounds);
        assert_eq!(pool, arr2(&[[0.1, 0.9]]));
    }
}
