pub mod filter;
pub mod storage;
pub mod types;

pub use filter::{filter_records, RecordFilter};
pub use storage::{get_store_path, load_record_store, save_record_store};
pub use types::{Acknowledgment, EvaluationDraft, EvaluationRecord, RecordStore};
