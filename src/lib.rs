//! Call-center quality feedback: rubric scoring, evaluation records and
//! agent acknowledgments.
//!
//! The scoring engine in [`scoring`] is pure; everything else loads its
//! inputs or stores its output.

pub mod catalog;
pub mod config;
pub mod output;
pub mod records;
pub mod scoring;
pub mod selection;
pub mod telemetry;

pub use catalog::{Catalog, RubricItem};
pub use scoring::{evaluate, evaluate_with_rules, Category, EvaluationResult, ScoringRules};
pub use selection::{SelectedItem, Selection};
