use crate::types::ProposedCandidate;
use std::fmt;

/// Opaque rejection of a model reply
///
/// The cause is retained for debug logging only; callers react to every
/// rejection the same way (append the corrective warning and retry).
#[derive(Debug)]
pub struct InvalidReply {
    reason: String,
}

impl InvalidReply {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvalidReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Structural check of a raw model reply
///
/// The reply must be a JSON array of exactly `pool_size` objects, each with
/// a numeric `values` array of exactly `n_vars` entries and a `rationale`
/// string. Extra fields are tolerated; anything else is rejected.
pub struct SchemaCheck {
    pool_size: usize,
    n_vars: usize,
}

impl SchemaCheck {
    pub fn new(pool_size: usize, n_vars: usize) -> Self {
        Self { pool_size, n_vars }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn run(&self, raw: &str) -> Result<Vec<ProposedCandidate>, InvalidReply> {
        let proposals: Vec<ProposedCandidate> = serde_json::from_str(raw.trim())
            .map_err(|e| InvalidReply::new(format!("Not a JSON candidate array: {}", e)))?;

        if proposals.len() != self.pool_size {
            return Err(InvalidReply::new(format!(
                "Expected {} candidates, got {}",
                self.pool_size,
                proposals.len()
            )));
        }

        for (i, proposal) in proposals.iter().enumerate() {
            if proposal.values.len() != self.n_vars {
                return Err(InvalidReply::new(format!(
                    "Candidate {} has {} values, expected {}",
                    i,
                    proposal.values.len(),
                    self.n_vars
                )));
            }
        }

        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_exact_shape() {
        let check = SchemaCheck::new(2, 3);
        let raw = r#"[
            {"values": [0.1, 0.2, 0.3], "rationale": "spread parameter 0"},
            {"values": [0.4, 0.5, 0.6], "rationale": "stabilize parameter 2"}
        ]"#;

        let proposals = check.run(raw).unwrap();
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].values, vec![0.1, 0.2, 0.3]);
        assert_eq!(proposals[1].rationale, "stabilize parameter 2");
    }

    #[test]
    fn test_accepts_surrounding_whitespace_and_integers() {
        let check = SchemaCheck::new(1, 2);
        let raw = "\n  [{\"values\": [0, 1], \"rationale\": \"corner\"}]  \n";
        assert!(check.run(raw).is_ok());
    }

    #[test]
    fn test_rejects_prose() {
        let check = SchemaCheck::new(2, 3);
        assert!(check.run("Sure! Here is the new pool:").is_err());
    }

    #[test]
    fn test_rejects_wrong_list_length() {
        let check = SchemaCheck::new(3, 2);
        let raw = r#"[
            {"values": [0.1, 0.2], "rationale": "a"},
            {"values": [0.3, 0.4], "rationale": "b"}
        ]"#;
        assert!(check.run(raw).is_err());
    }

    #[test]
    fn test_rejects_missing_rationale() {
        let check = SchemaCheck::new(1, 2);
        let raw = r#"[{"values": [0.1, 0.2]}]"#;
        assert!(check.run(raw).is_err());
    }

    #[test]
    fn test_rejects_wrong_values_arity() {
        let check = SchemaCheck::new(1, 3);
        let raw = r#"[{"values": [0.1, 0.2], "rationale": "short"}]"#;
        assert!(check.run(raw).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_values() {
        let check = SchemaCheck::new(1, 2);
        let raw = r#"[{"values": [0.1, "x"], "rationale": "bad"}]"#;
        assert!(check.run(raw).is_err());
    }

    #[test]
    fn test_rejects_trailing_prose() {
        let check = SchemaCheck::new(1, 1);
        let raw = "[{\"values\": [0.5], \"rationale\": \"ok\"}]\nHope that helps!";
        assert!(check.run(raw).is_err());
    }

    #[test]
    fn test_tolerates_extra_fields() {
        let check = SchemaCheck::new(1, 1);
        let raw = r#"[{"values": [0.5], "rationale": "ok", "confidence": 0.9}]"#;
        assert!(check.run(raw).is_ok());
    }
}
