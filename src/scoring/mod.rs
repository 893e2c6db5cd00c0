pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{Category, Penalty};
pub use engine::{evaluate, evaluate_with_rules, CategoryDeduction, Deduction, EvaluationResult};
pub use validation::validate_rules;
