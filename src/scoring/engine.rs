use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::ScoringRules;
use super::factors::{Category, Penalty};
use crate::catalog::Catalog;
use crate::selection::SelectedItem;

/// Outcome of one category's rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "points")]
pub enum Deduction {
    /// A critical item was selected and the score was forced to zero
    ZeroOut,
    /// Points subtracted from the base score
    Points(f64),
    /// Skipped because a critical item already zeroed the score
    NotApplied,
    NoDeduction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDeduction {
    /// Number of selected items that fell into the category
    pub items: usize,
    pub deduction: Deduction,
}

impl CategoryDeduction {
    /// Points this category removed from the score (0 for markers)
    pub fn points(&self) -> f64 {
        match self.deduction {
            Deduction::Points(points) => points,
            _ => 0.0,
        }
    }

    /// Human-readable summary, e.g. "-3.5 (2 items)" or "none"
    pub fn summary(&self) -> String {
        let plural = if self.items == 1 { "" } else { "s" };
        match self.deduction {
            Deduction::ZeroOut => format!("score set to 0 ({} item{})", self.items, plural),
            Deduction::Points(points) => {
                format!("-{} ({} item{})", round_to_tenth(points), self.items, plural)
            }
            Deduction::NotApplied if self.items > 0 => {
                format!("not applied, critical failure ({} item{})", self.items, plural)
            }
            Deduction::NotApplied | Deduction::NoDeduction => "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Final score in [0, 100] with one decimal
    pub score: f64,
    pub approved: bool,
    /// One entry per category, in severity order
    pub deductions: BTreeMap<Category, CategoryDeduction>,
    /// Selected names missing from the catalog, scored as NONE
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

impl EvaluationResult {
    /// Total points deducted by non-critical categories, before clamping
    pub fn total_deducted(&self) -> f64 {
        self.deductions.values().map(CategoryDeduction::points).sum()
    }

    pub fn is_critical(&self) -> bool {
        self.deductions
            .get(&Category::CriticalFailure)
            .is_some_and(|d| d.deduction == Deduction::ZeroOut)
    }
}

/// Score a selection with the standard rubric constants.
pub fn evaluate(selected: &[SelectedItem], catalog: &Catalog) -> EvaluationResult {
    evaluate_with_rules(selected, catalog, &ScoringRules::default())
}

/// Score a selection against the catalog.
///
/// Never fails: names missing from the catalog count as NONE with weight 0,
/// duplicates each contribute, and the result does not depend on the order of
/// `selected`.
pub fn evaluate_with_rules(
    selected: &[SelectedItem],
    catalog: &Catalog,
    rules: &ScoringRules,
) -> EvaluationResult {
    let mut weights: BTreeMap<Category, Vec<f64>> =
        Category::ALL.iter().map(|&c| (c, Vec::new())).collect();
    let mut unresolved = Vec::new();

    for item in selected {
        let (category, weight) = match catalog.resolve(&item.name) {
            Some(rubric_item) => (rubric_item.category, rubric_item.weight),
            None => {
                unresolved.push(item.name.clone());
                (Category::None, 0.0)
            }
        };
        weights.entry(category).or_default().push(weight);
    }
    unresolved.sort();

    let critical = weights
        .get(&Category::CriticalFailure)
        .is_some_and(|w| !w.is_empty());

    let mut deductions = BTreeMap::new();
    let mut score = rules.base_score;

    for (&category, category_weights) in &weights {
        let penalty = category.penalty(rules);
        let deduction = if critical {
            if penalty == Penalty::ZeroOut {
                Deduction::ZeroOut
            } else {
                Deduction::NotApplied
            }
        } else {
            match penalty.deduction(category_weights) {
                Some(points) => {
                    score -= points;
                    Deduction::Points(points)
                }
                None => Deduction::NoDeduction,
            }
        };

        deductions.insert(
            category,
            CategoryDeduction {
                items: category_weights.len(),
                deduction,
            },
        );
    }

    if critical {
        score = 0.0;
    }
    let score = round_to_tenth(score.clamp(0.0, 100.0));

    EvaluationResult {
        score,
        approved: rules.is_approved(score),
        deductions,
        unresolved,
    }
}

/// Round half away from zero to one decimal place
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
