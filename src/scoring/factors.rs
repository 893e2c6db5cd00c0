use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::ScoringRules;

/// Penalty category of a rubric item.
///
/// Ordering follows severity of the rule, which is also the order the
/// deduction breakdown is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    CriticalFailure,
    CumulativeSoft,
    NegativeSingle,
    UncomplianceSingle,
    ComplianceSingle,
    None,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::CriticalFailure,
        Category::CumulativeSoft,
        Category::NegativeSingle,
        Category::UncomplianceSingle,
        Category::ComplianceSingle,
        Category::None,
    ];

    /// Parse a category from its config name ("CUMULATIVE_SOFT") or a
    /// lowercase/kebab variant ("cumulative-soft").
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "CRITICAL_FAILURE" => Ok(Category::CriticalFailure),
            "CUMULATIVE_SOFT" => Ok(Category::CumulativeSoft),
            "NEGATIVE_SINGLE" => Ok(Category::NegativeSingle),
            "UNCOMPLIANCE_SINGLE" => Ok(Category::UncomplianceSingle),
            "COMPLIANCE_SINGLE" => Ok(Category::ComplianceSingle),
            "NONE" => Ok(Category::None),
            _ => bail!("Unknown category: {}", s),
        }
    }

    /// Config name of the category, as written in catalog files
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CriticalFailure => "CRITICAL_FAILURE",
            Category::CumulativeSoft => "CUMULATIVE_SOFT",
            Category::NegativeSingle => "NEGATIVE_SINGLE",
            Category::UncomplianceSingle => "UNCOMPLIANCE_SINGLE",
            Category::ComplianceSingle => "COMPLIANCE_SINGLE",
            Category::None => "NONE",
        }
    }

    /// Human-readable label for breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            Category::CriticalFailure => "Critical failure",
            Category::CumulativeSoft => "Cumulative soft",
            Category::NegativeSingle => "Negative (single)",
            Category::UncomplianceSingle => "Uncompliance (single)",
            Category::ComplianceSingle => "Compliance (single)",
            Category::None => "No finding",
        }
    }

    /// The rule this category is scored with under the given constants.
    pub fn penalty(&self, rules: &ScoringRules) -> Penalty {
        match self {
            Category::CriticalFailure => Penalty::ZeroOut,
            Category::CumulativeSoft => Penalty::Proportional(rules.soft_pool),
            Category::NegativeSingle => Penalty::Flat(rules.negative_flat),
            Category::UncomplianceSingle => Penalty::Flat(rules.uncompliance_flat),
            Category::ComplianceSingle => Penalty::Flat(rules.compliance_flat),
            Category::None => Penalty::NoPenalty,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Penalty {
    /// Forces the final score to zero
    ZeroOut,
    /// `pool * (sum_of_weights / 100)`, sum not capped
    Proportional(f64),
    /// Fixed deduction when at least one item is present
    Flat(f64),
    NoPenalty,
}

impl Penalty {
    /// Points deducted for a category given its selected weights.
    /// Returns None when nothing is deducted. `ZeroOut` has no point value and
    /// is handled by the engine before deductions are summed.
    pub fn deduction(&self, weights: &[f64]) -> Option<f64> {
        if weights.is_empty() {
            return None;
        }
        match self {
            Penalty::ZeroOut | Penalty::NoPenalty => None,
            Penalty::Proportional(pool) => {
                // Canonical order keeps float addition independent of selection order
                let mut sorted = weights.to_vec();
                sorted.sort_by(f64::total_cmp);
                let sum: f64 = sorted.iter().sum();
                Some(pool * sum / 100.0)
            }
            Penalty::Flat(points) => Some(*points),
        }
    }
}
