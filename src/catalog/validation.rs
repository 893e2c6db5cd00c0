use std::collections::HashSet;

use super::items::RubricItem;

/// Validate catalog items.
/// Returns all validation errors at once (not just the first).
pub fn validate_items(items: &[RubricItem]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        let name = item.name.trim();
        if name.is_empty() {
            errors.push(format!("items[{}].name: must not be empty", i));
        } else if !seen.insert(name) {
            errors.push(format!("items[{}].name: duplicate name '{}'", i, name));
        }

        // '=' separates the item name from its detail on the command line
        if item.name.contains('=') {
            errors.push(format!(
                "items[{}].name: '{}' must not contain '='",
                i, item.name
            ));
        }

        if !(0.0..=100.0).contains(&item.weight) {
            errors.push(format!(
                "items[{}].weight: {} is outside 0-100",
                i, item.weight
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
