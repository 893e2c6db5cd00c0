use super::config::ScoringRules;

/// Validate scoring rules at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &ScoringRules) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(rules.base_score > 0.0 && rules.base_score <= 100.0) {
        errors.push(format!(
            "scoring.base_score: {} must be greater than 0 and at most 100",
            rules.base_score
        ));
    }

    if !(0.0..=100.0).contains(&rules.approval_threshold) {
        errors.push(format!(
            "scoring.approval_threshold: {} is outside 0-100",
            rules.approval_threshold
        ));
    } else if rules.approval_threshold > rules.base_score {
        errors.push(format!(
            "scoring.approval_threshold: {} is above base_score {}, nothing could be approved",
            rules.approval_threshold, rules.base_score
        ));
    }

    let deductions = [
        ("soft_pool", rules.soft_pool),
        ("negative_flat", rules.negative_flat),
        ("uncompliance_flat", rules.uncompliance_flat),
        ("compliance_flat", rules.compliance_flat),
    ];
    for (name, value) in deductions {
        if !(value >= 0.0 && value.is_finite()) {
            errors.push(format!("scoring.{}: must be non-negative", name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_valid() {
        assert!(validate_rules(&ScoringRules::default()).is_ok());
    }

    #[test]
    fn test_zero_deductions_valid() {
        let rules = ScoringRules {
            soft_pool: 0.0,
            compliance_flat: 0.0,
            ..ScoringRules::default()
        };
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn test_negative_flat() {
        let rules = ScoringRules {
            negative_flat: -30.0,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.negative_flat"));
    }

    #[test]
    fn test_base_score_out_of_range() {
        let rules = ScoringRules {
            base_score: 0.0,
            approval_threshold: 0.0,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("scoring.base_score"));
    }

    #[test]
    fn test_threshold_above_base() {
        let rules = ScoringRules {
            base_score: 80.0,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.approval_threshold"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let rules = ScoringRules {
            approval_threshold: 120.0,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert!(errors[0].contains("outside 0-100"));
    }

    #[test]
    fn test_collects_all_errors() {
        let rules = ScoringRules {
            base_score: -1.0,
            soft_pool: -25.0,
            compliance_flat: f64::NAN,
            ..ScoringRules::default()
        };
        let errors = validate_rules(&rules).unwrap_err();
        // base_score, threshold above base, soft_pool, compliance_flat
        assert_eq!(errors.len(), 4);
    }
}
