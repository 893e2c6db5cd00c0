use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::EvaluationResult;
use crate::selection::SelectedItem;

pub const STORE_VERSION: u32 = 1;

/// An evaluation ready to be submitted by a supervisor
#[derive(Debug, Clone)]
pub struct EvaluationDraft {
    pub agent: String,
    pub supervisor: String,
    pub call_id: Option<String>,
    pub observations: Option<String>,
    pub items: Vec<SelectedItem>,
}

/// Agent's signed acknowledgment of an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub signed_by: String,
    pub signed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: u64,
    pub agent: String,
    pub supervisor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub evaluated_at: DateTime<Utc>,
    pub items: Vec<SelectedItem>,
    pub score: f64,
    pub approved: bool,
    #[serde(default)]
    pub acknowledgment: Option<Acknowledgment>,
}

impl EvaluationRecord {
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledgment.is_some()
    }

    pub fn is_for_agent(&self, agent: &str) -> bool {
        self.agent.eq_ignore_ascii_case(agent.trim())
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.evaluated_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStore {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<EvaluationRecord>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create a new empty store with the current version
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            records: Vec::new(),
        }
    }

    /// Persist a scored evaluation and return its id.
    ///
    /// The score is taken from `result`; the store never rescores.
    pub fn submit(
        &mut self,
        draft: EvaluationDraft,
        result: &EvaluationResult,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let agent = draft.agent.trim();
        let supervisor = draft.supervisor.trim();
        if agent.is_empty() {
            bail!("Agent is required");
        }
        if supervisor.is_empty() {
            bail!("Supervisor is required");
        }

        let id = self.next_id();
        self.records.push(EvaluationRecord {
            id,
            agent: agent.to_string(),
            supervisor: supervisor.to_string(),
            call_id: draft.call_id,
            observations: draft.observations,
            evaluated_at: now,
            items: draft.items,
            score: result.score,
            approved: result.approved,
            acknowledgment: None,
        });
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&EvaluationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Record the evaluated agent's acknowledgment.
    ///
    /// Fails if the record does not exist, was already acknowledged, or
    /// `signer` is not the evaluated agent.
    pub fn acknowledge(
        &mut self,
        id: u64,
        signer: &str,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&EvaluationRecord> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            bail!("Evaluation #{} not found", id);
        };

        if let Some(ack) = &record.acknowledgment {
            bail!(
                "Evaluation #{} was already acknowledged by {} on {}",
                id,
                ack.signed_by,
                ack.signed_at.format("%Y-%m-%d")
            );
        }

        if !record.is_for_agent(signer) {
            bail!(
                "Evaluation #{} belongs to {}; {} cannot acknowledge it",
                id,
                record.agent,
                signer.trim()
            );
        }

        record.acknowledgment = Some(Acknowledgment {
            signed_by: record.agent.clone(),
            signed_at: now,
            comment: comment.filter(|c| !c.trim().is_empty()),
        });
        Ok(record)
    }

    /// Unacknowledged evaluations for an agent, oldest first
    pub fn pending_for(&self, agent: &str) -> Vec<&EvaluationRecord> {
        let mut pending: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.is_for_agent(agent) && !r.is_acknowledged())
            .collect();
        pending.sort_by_key(|r| (r.evaluated_at, r.id));
        pending
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::scoring::evaluate;
    use chrono::Duration;

    fn draft(agent: &str, items: &[&str]) -> EvaluationDraft {
        EvaluationDraft {
            agent: agent.to_string(),
            supervisor: "maria.lopez".to_string(),
            call_id: Some("CALL-001".to_string()),
            observations: None,
            items: items.iter().map(|n| SelectedItem::new(*n)).collect(),
        }
    }

    fn submit(store: &mut RecordStore, agent: &str, items: &[&str]) -> u64 {
        let catalog = Catalog::builtin().unwrap();
        let d = draft(agent, items);
        let result = evaluate(&d.items, &catalog);
        store.submit(d, &result, Utc::now()).unwrap()
    }

    #[test]
    fn test_new_store_empty() {
        let store = RecordStore::new();
        assert_eq!(store.version, 1);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let mut store = RecordStore::new();
        assert_eq!(submit(&mut store, "ana", &[]), 1);
        assert_eq!(submit(&mut store, "ben", &[]), 2);
    }

    #[test]
    fn test_submit_stores_result() {
        let mut store = RecordStore::new();
        let id = submit(&mut store, "ana", &["Gave incorrect information"]);

        let record = store.get(id).unwrap();
        assert_eq!(record.score, 70.0);
        assert!(!record.approved);
        assert_eq!(record.items.len(), 1);
        assert!(!record.is_acknowledged());
    }

    #[test]
    fn test_submit_requires_agent_and_supervisor() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = RecordStore::new();

        let d = draft("  ", &[]);
        let result = evaluate(&d.items, &catalog);
        assert!(store.submit(d, &result, Utc::now()).is_err());

        let mut d = draft("ana", &[]);
        d.supervisor = String::new();
        assert!(store.submit(d, &result, Utc::now()).is_err());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_acknowledge() {
        let mut store = RecordStore::new();
        let id = submit(&mut store, "ana", &[]);

        let record = store
            .acknowledge(id, "ANA", Some("Understood".to_string()), Utc::now())
            .unwrap();
        let ack = record.acknowledgment.as_ref().unwrap();
        assert_eq!(ack.signed_by, "ana");
        assert_eq!(ack.comment.as_deref(), Some("Understood"));
    }

    #[test]
    fn test_acknowledge_twice_fails() {
        let mut store = RecordStore::new();
        let id = submit(&mut store, "ana", &[]);

        store.acknowledge(id, "ana", None, Utc::now()).unwrap();
        let err = store.acknowledge(id, "ana", None, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("already acknowledged"));
    }

    #[test]
    fn test_acknowledge_by_other_agent_fails() {
        let mut store = RecordStore::new();
        let id = submit(&mut store, "ana", &[]);

        let err = store.acknowledge(id, "ben", None, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("belongs to ana"));
        assert!(!store.get(id).unwrap().is_acknowledged());
    }

    #[test]
    fn test_acknowledge_missing_record() {
        let mut store = RecordStore::new();
        assert!(store.acknowledge(42, "ana", None, Utc::now()).is_err());
    }

    #[test]
    fn test_blank_comment_dropped() {
        let mut store = RecordStore::new();
        let id = submit(&mut store, "ana", &[]);
        let record = store
            .acknowledge(id, "ana", Some("   ".to_string()), Utc::now())
            .unwrap();
        assert!(record.acknowledgment.as_ref().unwrap().comment.is_none());
    }

    #[test]
    fn test_pending_for_agent() {
        let mut store = RecordStore::new();
        let first = submit(&mut store, "ana", &[]);
        submit(&mut store, "ben", &[]);
        let third = submit(&mut store, "ana", &[]);
        store.acknowledge(first, "ana", None, Utc::now()).unwrap();

        let pending = store.pending_for("ana");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, third);
    }

    #[test]
    fn test_pending_sorted_oldest_first() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = RecordStore::new();
        let now = Utc::now();

        let d = draft("ana", &[]);
        let result = evaluate(&d.items, &catalog);
        let newer = store.submit(d, &result, now).unwrap();
        let older = store
            .submit(draft("ana", &[]), &result, now - Duration::days(2))
            .unwrap();

        let pending = store.pending_for("ana");
        assert_eq!(pending[0].id, older);
        assert_eq!(pending[1].id, newer);
    }
}
