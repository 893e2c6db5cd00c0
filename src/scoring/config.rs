use serde::{Deserialize, Serialize};

pub const BASE_SCORE: f64 = 100.0;
/// Minimum score for an evaluation to count as approved. The badge shown to
/// supervisors and agents is derived from the same value.
pub const APPROVAL_THRESHOLD: f64 = 85.0;
pub const SOFT_POOL: f64 = 25.0;
pub const NEGATIVE_FLAT: f64 = 30.0;
pub const UNCOMPLIANCE_FLAT: f64 = 35.0;
pub const COMPLIANCE_FLAT: f64 = 10.0;

/// Scoring constants applied by the rubric engine.
///
/// Every field is optional in YAML and falls back to the standard call-center
/// rubric.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   approval_threshold: 85
///   soft_pool: 25
///   negative_flat: 30
///   uncompliance_flat: 35
///   compliance_flat: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringRules {
    /// Starting score before deductions (default: 100)
    pub base_score: f64,

    /// Scores at or above this value are approved (default: 85)
    pub approval_threshold: f64,

    /// Maximum impact of CUMULATIVE_SOFT items when their weights sum to 100
    pub soft_pool: f64,

    /// Flat deduction when any NEGATIVE_SINGLE item is selected
    pub negative_flat: f64,

    /// Flat deduction when any UNCOMPLIANCE_SINGLE item is selected
    pub uncompliance_flat: f64,

    /// Flat deduction when any COMPLIANCE_SINGLE item is selected
    pub compliance_flat: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: BASE_SCORE,
            approval_threshold: APPROVAL_THRESHOLD,
            soft_pool: SOFT_POOL,
            negative_flat: NEGATIVE_FLAT,
            uncompliance_flat: UNCOMPLIANCE_FLAT,
            compliance_flat: COMPLIANCE_FLAT,
        }
    }
}

impl ScoringRules {
    pub fn is_approved(&self, score: f64) -> bool {
        score >= self.approval_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = ScoringRules::default();

        assert_eq!(rules.base_score, 100.0);
        assert_eq!(rules.approval_threshold, 85.0);
        assert_eq!(rules.soft_pool, 25.0);
        assert_eq!(rules.negative_flat, 30.0);
        assert_eq!(rules.uncompliance_flat, 35.0);
        assert_eq!(rules.compliance_flat, 10.0);
    }

    #[test]
    fn test_is_approved_at_threshold() {
        let rules = ScoringRules::default();
        assert!(rules.is_approved(85.0));
        assert!(rules.is_approved(100.0));
        assert!(!rules.is_approved(84.9));
        assert!(!rules.is_approved(0.0));
    }

    #[test]
    fn test_rules_serde_roundtrip() {
        let rules = ScoringRules::default();
        let yaml = serde_saphyr::to_string(&rules).unwrap();
        let parsed: ScoringRules = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(rules, parsed);
    }

    #[test]
    fn test_partial_rules_parse() {
        let yaml = r#"
approval_threshold: 90
compliance_flat: 5
"#;
        let rules: ScoringRules = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.approval_threshold, 90.0);
        assert_eq!(rules.compliance_flat, 5.0);
        assert_eq!(rules.soft_pool, 25.0);
        assert_eq!(rules.base_score, 100.0);
    }

    #[test]
    fn test_empty_rules_parse() {
        let rules: ScoringRules = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(rules, ScoringRules::default());
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let yaml = "critical_flat: 100\n";
        let result: Result<ScoringRules, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
