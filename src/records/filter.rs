use chrono::{DateTime, Utc};

use super::types::EvaluationRecord;

/// Criteria for listing evaluation records
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub agent: Option<String>,
    pub pending_only: bool,
    /// Only records evaluated at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn matches(&self, record: &EvaluationRecord) -> bool {
        if let Some(ref agent) = self.agent {
            if !record.is_for_agent(agent) {
                return false;
            }
        }
        if self.pending_only && record.is_acknowledged() {
            return false;
        }
        if let Some(since) = self.since {
            if record.evaluated_at < since {
                return false;
            }
        }
        true
    }
}

/// Records matching `filter`, newest first (ties broken by id, highest first)
pub fn filter_records<'a>(
    records: &'a [EvaluationRecord],
    filter: &RecordFilter,
) -> Vec<&'a EvaluationRecord> {
    let mut matched: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
    matched.sort_by(|a, b| {
        b.evaluated_at
            .cmp(&a.evaluated_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    matched
}
