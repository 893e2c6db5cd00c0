use std::io::IsTerminal;
use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::catalog::Catalog;
use crate::records::EvaluationRecord;
use crate::scoring::{Category, Deduction, EvaluationResult};

const APPROVED: &str = "APPROVED";
const NOT_APPROVED: &str = "NOT APPROVED";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with exactly one decimal ("96.5", "100.0")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Approval badge, green when approved and red otherwise
pub fn format_badge(approved: bool, use_colors: bool) -> String {
    match (approved, use_colors) {
        (true, true) => APPROVED.green().bold().to_string(),
        (false, true) => NOT_APPROVED.red().bold().to_string(),
        (true, false) => APPROVED.to_string(),
        (false, false) => NOT_APPROVED.to_string(),
    }
}

/// Format an evaluation result: score and badge, then one line per category
pub fn format_result(result: &EvaluationResult, use_colors: bool) -> String {
    let score = format_score(result.score);
    let mut lines = vec![if use_colors {
        format!("Score: {}  {}", score.bold(), format_badge(result.approved, true))
    } else {
        format!("Score: {}  {}", score, format_badge(result.approved, false))
    }];

    for (category, deduction) in &result.deductions {
        let label = format!("{:<22}", category.label());
        let summary = deduction.summary();
        let line = if use_colors {
            match deduction.deduction {
                Deduction::ZeroOut => format!("  {}{}", label, summary.red().bold()),
                Deduction::Points(_) => format!("  {}{}", label, summary.yellow()),
                Deduction::NotApplied | Deduction::NoDeduction => {
                    format!("  {}{}", label, summary.dimmed())
                }
            }
        } else {
            format!("  {}{}", label, summary)
        };
        lines.push(line);
    }

    if !result.unresolved.is_empty() {
        lines.push(format!(
            "  Unknown items (scored as no finding): {}",
            result.unresolved.join(", ")
        ));
    }

    lines.join("\n")
}

/// Format the rubric catalog grouped by category, optionally restricted to one
pub fn format_catalog(catalog: &Catalog, only: Option<Category>, use_colors: bool) -> String {
    let mut sections = Vec::new();

    for category in Category::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        let items: Vec<_> = catalog.by_category(category).collect();
        if items.is_empty() {
            continue;
        }

        let header = if use_colors {
            category.as_str().cyan().bold().to_string()
        } else {
            category.as_str().to_string()
        };
        let mut lines = vec![header];
        for item in items {
            let weight = format!("{:>5}", item.weight);
            if use_colors {
                lines.push(format!("  {}  {}", weight.dimmed(), item.name));
            } else {
                lines.push(format!("  {}  {}", weight, item.name));
            }
        }
        sections.push(lines.join("\n"));
    }

    if sections.is_empty() {
        "No rubric items found.".to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn ack_status(record: &EvaluationRecord) -> &'static str {
    if record.is_acknowledged() {
        "signed"
    } else {
        "pending"
    }
}

/// Format records as a table with columns: Id, Score, Badge, Status, Age, Agent, Call
/// No headers. Agent and call id share whatever width the terminal leaves.
pub fn format_records_table(records: &[&EvaluationRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No evaluations found.".to_string();
    }

    let term_width = get_terminal_width();
    let badge_width = NOT_APPROVED.len();
    // "#" + 4 id + 2 + 5 score + 2 + badge + 2 + 7 status + 2 + 4 age + 2
    let fixed_width = 1 + 4 + 2 + 5 + 2 + badge_width + 2 + 7 + 2 + 4 + 2;

    records
        .iter()
        .map(|record| {
            let id_str = format!("#{:<4}", record.id);
            let score_str = format!("{:>5}", format_score(record.score));
            let badge_plain = if record.approved { APPROVED } else { NOT_APPROVED };
            let badge_str = format!("{:<width$}", badge_plain, width = badge_width);
            let status_str = format!("{:<7}", ack_status(record));
            let age_str = format!("{:>4}", format_age(record.age()));

            let subject = match &record.call_id {
                Some(call_id) => format!("{} ({})", record.agent, call_id),
                None => record.agent.clone(),
            };
            let subject = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&subject, width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_text(&subject, 20),
                // No terminal (pipe), don't truncate
                None => subject,
            };

            if use_colors {
                let badge = if record.approved {
                    badge_str.green().to_string()
                } else {
                    badge_str.red().to_string()
                };
                format!(
                    "{}  {}  {}  {}  {}  {}",
                    id_str.dimmed(),
                    score_str.bold(),
                    badge,
                    status_str,
                    age_str.dimmed(),
                    subject
                )
            } else {
                format!(
                    "{}  {}  {}  {}  {}  {}",
                    id_str, score_str, badge_str, status_str, age_str, subject
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single record with detailed multi-line output
pub fn format_record_detail(record: &EvaluationRecord, use_colors: bool) -> String {
    let title = format!("Evaluation #{}", record.id);
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    lines.push(format!("  Agent: {}", record.agent));
    lines.push(format!("  Supervisor: {}", record.supervisor));
    if let Some(ref call_id) = record.call_id {
        lines.push(format!("  Call: {}", call_id));
    }
    lines.push(format!(
        "  Evaluated: {} ({} ago)",
        record.evaluated_at.format("%Y-%m-%d %H:%M UTC"),
        format_age(record.age())
    ));
    lines.push(format!(
        "  Score: {}  {}",
        format_score(record.score),
        format_badge(record.approved, use_colors)
    ));

    if record.items.is_empty() {
        lines.push("  Items: none".to_string());
    } else {
        lines.push("  Items:".to_string());
        for item in &record.items {
            match &item.detail {
                Some(detail) => lines.push(format!("    - {}: {}", item.name, detail)),
                None => lines.push(format!("    - {}", item.name)),
            }
        }
    }

    if let Some(ref observations) = record.observations {
        lines.push(format!("  Observations: {}", observations));
    }

    match &record.acknowledgment {
        Some(ack) => {
            lines.push(format!(
                "  Acknowledged: {} on {}",
                ack.signed_by,
                ack.signed_at.format("%Y-%m-%d %H:%M UTC")
            ));
            if let Some(ref comment) = ack.comment {
                lines.push(format!("  Agent comment: {}", comment));
            }
        }
        None => lines.push("  Acknowledged: pending".to_string()),
    }

    lines.join("\n")
}

/// Format records as tab-separated values for scripting
/// Columns: id, score, approved, status, agent, supervisor, evaluated_at (no headers, no colors)
pub fn format_tsv(records: &[&EvaluationRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                record.id,
                format_score(record.score),
                record.approved,
                ack_status(record),
                record.agent,
                record.supervisor,
                record.evaluated_at.to_rfc3339()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
