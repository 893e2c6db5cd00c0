use super::types::{RecordStore, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default record store path (~/.config/qa-feedback/records.json)
pub fn get_store_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("records.json"))
}

/// Load the record store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_record_store(path: &Path) -> Result<RecordStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no record store yet, starting empty");
        return Ok(RecordStore::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open record store at {}", path.display()))?;

    let store: RecordStore = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load record store from {}", path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported record store version: {}", store.version);
    }

    tracing::debug!(records = store.records.len(), "loaded record store");
    Ok(store)
}

/// Save the record store to a JSON file atomically
///
/// The file is replaced in one step, so a crash never leaves a partial store.
/// Creates the parent directory if it doesn't exist.
pub fn save_record_store(path: &Path, store: &RecordStore) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize record store")?;

    file.commit().context("Failed to save record store")?;

    tracing::debug!(path = %path.display(), records = store.records.len(), "saved record store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::records::EvaluationDraft;
    use crate::scoring::evaluate;
    use crate::selection::SelectedItem;
    use chrono::Utc;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("qa_feedback_test_missing_store.json");
        let _ = std::fs::remove_file(&temp_path);

        let store = load_record_store(&temp_path).unwrap();
        assert_eq!(store.version, 1);
        assert!(store.records.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("qa_feedback_test_store_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let catalog = Catalog::builtin().unwrap();
        let draft = EvaluationDraft {
            agent: "ana".to_string(),
            supervisor: "maria.lopez".to_string(),
            call_id: Some("CALL-77".to_string()),
            observations: Some("Good recovery after hold".to_string()),
            items: vec![
                SelectedItem::with_detail("Hold without notice", "90s at 03:12"),
                SelectedItem::new("Did not confirm callback number"),
            ],
        };
        let result = evaluate(&draft.items, &catalog);

        let mut store = RecordStore::new();
        let id = store.submit(draft, &result, Utc::now()).unwrap();
        store
            .acknowledge(id, "ana", Some("Will announce holds".to_string()), Utc::now())
            .unwrap();

        save_record_store(&temp_path, &store).unwrap();
        let loaded = load_record_store(&temp_path).unwrap();

        assert_eq!(loaded.records, store.records);
        let record = loaded.get(id).unwrap();
        assert_eq!(record.score, 87.5);
        assert!(record.approved);
        assert_eq!(record.items[0].detail.as_deref(), Some("90s at 03:12"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let temp_path = env::temp_dir().join("qa_feedback_test_store_version.json");
        std::fs::write(&temp_path, r#"{"version": 2, "records": []}"#).unwrap();

        let err = load_record_store(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported record store version"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let temp_path = env::temp_dir().join("qa_feedback_test_store_corrupt.json");
        std::fs::write(&temp_path, "not json").unwrap();

        assert!(load_record_store(&temp_path).is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
