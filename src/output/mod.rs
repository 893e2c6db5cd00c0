pub mod formatter;

pub use formatter::{
    format_age, format_badge, format_catalog, format_record_detail, format_records_table,
    format_result, format_score, format_tsv, should_use_colors,
};
