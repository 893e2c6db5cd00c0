use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::validation::validate_items;
use crate::scoring::Category;

const BUILTIN_CATALOG: &str = include_str!("default_catalog.yaml");

/// One evaluation criterion an observer can flag against a call.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RubricItem {
    pub name: String,
    /// Category-relative severity percentage (0-100)
    pub weight: f64,
    pub category: Category,
}

/// On-disk shape of a catalog file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    items: Vec<RubricItem>,
}

/// Immutable set of rubric items, indexed by name.
///
/// Built once at startup and only read afterwards, so a `&Catalog` can be
/// shared freely between evaluations.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<RubricItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from items, rejecting duplicate names and out-of-range
    /// weights. All problems are reported in one error.
    pub fn from_items(items: Vec<RubricItem>) -> Result<Self> {
        if let Err(errors) = validate_items(&items) {
            anyhow::bail!("Invalid rubric catalog:\n  - {}", errors.join("\n  - "));
        }

        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();

        Ok(Self { items, index })
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_saphyr::from_str(yaml).context("Failed to parse catalog YAML")?;
        Self::from_items(file.items)
    }

    /// The standard rubric shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG).context("Built-in catalog is invalid")
    }

    /// Load a catalog override from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))
    }

    pub fn resolve(&self, name: &str) -> Option<&RubricItem> {
        self.index.get(name).and_then(|&i| self.items.get(i))
    }

    pub fn items(&self) -> &[RubricItem] {
        &self.items
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &RubricItem> {
        self.items.iter().filter(move |item| item.category == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
