use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::scoring::{evaluate_with_rules, EvaluationResult, ScoringRules};

/// A rubric item flagged against one call, with the observer's note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SelectedItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: Some(detail.into()),
        }
    }

    /// Parse command-line input of the form `NAME` or `NAME=DETAIL`.
    pub fn parse(s: &str) -> Result<Self> {
        let (name, detail) = match s.split_once('=') {
            Some((name, detail)) => (name.trim(), Some(detail.trim())),
            None => (s.trim(), None),
        };

        if name.is_empty() {
            bail!("Item name is required: '{}'", s);
        }

        Ok(Self {
            name: name.to_string(),
            detail: detail.filter(|d| !d.is_empty()).map(str::to_string),
        })
    }
}

/// Items selected while editing one evaluation.
///
/// Duplicates are kept: adding the same item twice counts it twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    items: Vec<SelectedItem>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: SelectedItem) {
        self.items.push(item);
    }

    /// Remove the item at `index`, returning it if the index was valid
    pub fn remove(&mut self, index: usize) -> Option<SelectedItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Remove the first item with the given name
    pub fn remove_named(&mut self, name: &str) -> Option<SelectedItem> {
        let index = self.items.iter().position(|item| item.name == name)?;
        self.remove(index)
    }

    pub fn items(&self) -> &[SelectedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SelectedItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Score the current selection
    pub fn evaluate(&self, catalog: &Catalog, rules: &ScoringRules) -> EvaluationResult {
        evaluate_with_rules(&self.items, catalog, rules)
    }
}

impl FromIterator<SelectedItem> for Selection {
    fn from_iter<I: IntoIterator<Item = SelectedItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let item = SelectedItem::parse("Inappropriate tone").unwrap();
        assert_eq!(item.name, "Inappropriate tone");
        assert!(item.detail.is_none());
    }

    #[test]
    fn test_parse_name_and_detail() {
        let item = SelectedItem::parse("Hold without notice = 3 minutes at 02:10").unwrap();
        assert_eq!(item.name, "Hold without notice");
        assert_eq!(item.detail.as_deref(), Some("3 minutes at 02:10"));
    }

    #[test]
    fn test_parse_detail_keeps_later_separators() {
        let item = SelectedItem::parse("Unclear explanation=rate=5%").unwrap();
        assert_eq!(item.name, "Unclear explanation");
        assert_eq!(item.detail.as_deref(), Some("rate=5%"));
    }

    #[test]
    fn test_parse_empty_detail_is_none() {
        let item = SelectedItem::parse("No findings=  ").unwrap();
        assert!(item.detail.is_none());
    }

    #[test]
    fn test_parse_empty_name() {
        assert!(SelectedItem::parse("").is_err());
        assert!(SelectedItem::parse(" =detail").is_err());
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let mut selection = Selection::new();
        selection.add(SelectedItem::new("Did not greet per script"));
        selection.add(SelectedItem::new("Did not greet per script"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_remove_by_index() {
        let mut selection: Selection = vec![SelectedItem::new("A"), SelectedItem::new("B")]
            .into_iter()
            .collect();

        let removed = selection.remove(0).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(selection.len(), 1);
        assert!(selection.remove(5).is_none());
    }

    #[test]
    fn test_remove_named_removes_first_match_only() {
        let mut selection: Selection = vec![
            SelectedItem::with_detail("A", "first"),
            SelectedItem::new("B"),
            SelectedItem::with_detail("A", "second"),
        ]
        .into_iter()
        .collect();

        let removed = selection.remove_named("A").unwrap();
        assert_eq!(removed.detail.as_deref(), Some("first"));
        assert_eq!(selection.len(), 2);
        assert!(selection.remove_named("Missing").is_none());
    }

    #[test]
    fn test_evaluate_updates_with_selection() {
        let catalog = Catalog::builtin().unwrap();
        let rules = ScoringRules::default();
        let mut selection = Selection::new();

        assert_eq!(selection.evaluate(&catalog, &rules).score, 100.0);

        selection.add(SelectedItem::new("Incomplete case notes"));
        assert_eq!(selection.evaluate(&catalog, &rules).score, 90.0);

        selection.remove(0);
        assert_eq!(selection.evaluate(&catalog, &rules).score, 100.0);
    }
}
