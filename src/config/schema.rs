use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringRules;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Contents of `config.yaml`. Every key is optional.
///
/// Example YAML:
/// ```yaml
/// catalog: /etc/qa-feedback/rubric.yaml
/// store: /srv/qa/records.json
/// log_level: info
/// scoring:
///   approval_threshold: 85
/// ```
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rubric catalog override; the built-in catalog is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Evaluation record file (default: ~/.config/qa-feedback/records.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// tracing filter directive used when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringRules>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        self.scoring.clone().unwrap_or_default()
    }
}
