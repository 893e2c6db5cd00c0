use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qa_feedback::records::{EvaluationDraft, RecordFilter};
use qa_feedback::{Category, SelectedItem, Selection};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORE: i32 = 5;
const EXIT_INPUT: i32 = 6;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List evaluations, newest first (default if no subcommand)
    List {
        /// Only evaluations of this agent
        #[arg(long)]
        agent: Option<String>,
        /// Only evaluations the agent has not acknowledged yet
        #[arg(long)]
        pending: bool,
        /// Only evaluations newer than this, e.g. "7d" or "12h"
        #[arg(long)]
        since: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show the rubric catalog
    Items {
        /// Only items of this category (e.g. CUMULATIVE_SOFT)
        #[arg(long)]
        category: Option<String>,
    },
    /// Score a selection without saving it
    Score {
        /// Selected item as NAME or NAME=DETAIL (repeatable)
        #[arg(short, long = "item")]
        items: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a selection and save it as an evaluation
    Submit {
        /// Evaluated agent
        #[arg(long)]
        agent: String,
        /// Evaluating supervisor
        #[arg(long)]
        supervisor: String,
        /// Identifier of the evaluated call
        #[arg(long)]
        call_id: Option<String>,
        /// Free-text observations for the agent
        #[arg(long)]
        observations: Option<String>,
        /// Selected item as NAME or NAME=DETAIL (repeatable)
        #[arg(short, long = "item")]
        items: Vec<String>,
    },
    /// Show one evaluation in detail
    Show {
        id: u64,
    },
    /// Acknowledge an evaluation as the evaluated agent
    Sign {
        id: u64,
        /// Agent signing the acknowledgment
        #[arg(long)]
        agent: String,
        /// Optional comment from the agent
        #[arg(long)]
        comment: Option<String>,
    },
    /// Write a config file with the default scoring rules
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "qa-feedback")]
#[command(about = "Call-center quality evaluation CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/qa-feedback/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_with(code: i32, what: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", what, err);
    std::process::exit(code);
}

fn parse_items(raw: &[String]) -> Selection {
    raw.iter()
        .map(|s| SelectedItem::parse(s).unwrap_or_else(|e| exit_with(EXIT_INPUT, "Invalid item", e)))
        .collect()
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        agent: None,
        pending: false,
        since: None,
        tsv: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading, so it can replace a broken config
    if let Commands::Init { force } = command {
        let path = match config_path {
            Some(p) => p,
            None => qa_feedback::config::get_config_path()
                .unwrap_or_else(|e| exit_with(EXIT_CONFIG, "Config error", e)),
        };
        let config = qa_feedback::config::Config {
            log_level: Some(qa_feedback::config::DEFAULT_LOG_LEVEL.to_string()),
            scoring: Some(qa_feedback::ScoringRules::default()),
            ..Default::default()
        };
        if let Err(e) = qa_feedback::config::write_config(&path, &config, force) {
            exit_with(EXIT_CONFIG, "Config error", e);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = qa_feedback::config::load_config(config_path)
        .unwrap_or_else(|e| exit_with(EXIT_CONFIG, "Config error", e));

    if let Err(e) = qa_feedback::telemetry::init(config.log_level(), cli.verbose) {
        exit_with(EXIT_CONFIG, "Config error", e);
    }

    // Validate scoring rules at startup
    let rules = config.scoring_rules();
    if let Err(errors) = qa_feedback::scoring::validate_rules(&rules) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let catalog = qa_feedback::config::load_catalog(&config)
        .unwrap_or_else(|e| exit_with(EXIT_CONFIG, "Catalog error", e));
    tracing::debug!(items = catalog.len(), "rubric catalog loaded");

    let store_path = qa_feedback::config::store_path(&config)
        .unwrap_or_else(|e| exit_with(EXIT_CONFIG, "Config error", e));
    let use_colors = qa_feedback::output::should_use_colors();

    match command {
        Commands::Items { category } => {
            let only = category.map(|c| {
                Category::parse(&c).unwrap_or_else(|e| exit_with(EXIT_INPUT, "Invalid category", e))
            });
            println!(
                "{}",
                qa_feedback::output::format_catalog(&catalog, only, use_colors)
            );
        }
        Commands::Score { items, json } => {
            let selection = parse_items(&items);
            let result = selection.evaluate(&catalog, &rules);
            if json {
                match serde_json::to_string_pretty(&result) {
                    Ok(out) => println!("{}", out),
                    Err(e) => exit_with(EXIT_INPUT, "Failed to serialize result", e.into()),
                }
            } else {
                println!("{}", qa_feedback::output::format_result(&result, use_colors));
            }
        }
        Commands::Submit {
            agent,
            supervisor,
            call_id,
            observations,
            items,
        } => {
            let selection = parse_items(&items);
            let result = selection.evaluate(&catalog, &rules);

            // Scoring tolerates unknown names, but saving a typo would record a wrong score
            if !result.unresolved.is_empty() {
                eprintln!("Unknown rubric items: {}", result.unresolved.join(", "));
                eprintln!("Run `qa-feedback items` to see the catalog.");
                std::process::exit(EXIT_INPUT);
            }

            let mut store = qa_feedback::records::load_record_store(&store_path)
                .unwrap_or_else(|e| exit_with(EXIT_STORE, "Store error", e));

            let draft = EvaluationDraft {
                agent,
                supervisor,
                call_id,
                observations,
                items: selection.into_items(),
            };
            let id = store
                .submit(draft, &result, Utc::now())
                .unwrap_or_else(|e| exit_with(EXIT_INPUT, "Invalid evaluation", e));

            if let Err(e) = qa_feedback::records::save_record_store(&store_path, &store) {
                exit_with(EXIT_STORE, "Store error", e);
            }
            tracing::info!(id, score = result.score, approved = result.approved, "evaluation submitted");

            println!("Saved evaluation #{}", id);
            println!("{}", qa_feedback::output::format_result(&result, use_colors));
        }
        Commands::List {
            agent,
            pending,
            since,
            tsv,
        } => {
            let since = since.map(|s| {
                let duration = humantime::parse_duration(&s)
                    .unwrap_or_else(|e| exit_with(EXIT_INPUT, "Invalid --since", e.into()));
                let duration = chrono::Duration::from_std(duration)
                    .unwrap_or_else(|e| exit_with(EXIT_INPUT, "Invalid --since", e.into()));
                Utc::now() - duration
            });

            let store = qa_feedback::records::load_record_store(&store_path)
                .unwrap_or_else(|e| exit_with(EXIT_STORE, "Store error", e));
            let filter = RecordFilter {
                agent,
                pending_only: pending,
                since,
            };
            let records = qa_feedback::records::filter_records(store.records(), &filter);

            if tsv {
                if !records.is_empty() {
                    println!("{}", qa_feedback::output::format_tsv(&records));
                }
            } else {
                println!(
                    "{}",
                    qa_feedback::output::format_records_table(&records, use_colors)
                );
            }
        }
        Commands::Show { id } => {
            let store = qa_feedback::records::load_record_store(&store_path)
                .unwrap_or_else(|e| exit_with(EXIT_STORE, "Store error", e));
            match store.get(id) {
                Some(record) => println!(
                    "{}",
                    qa_feedback::output::format_record_detail(record, use_colors)
                ),
                None => {
                    eprintln!("Evaluation #{} not found", id);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Sign { id, agent, comment } => {
            let mut store = qa_feedback::records::load_record_store(&store_path)
                .unwrap_or_else(|e| exit_with(EXIT_STORE, "Store error", e));

            let detail = match store.acknowledge(id, &agent, comment, Utc::now()) {
                Ok(record) => qa_feedback::output::format_record_detail(record, use_colors),
                Err(e) => exit_with(EXIT_INPUT, "Cannot acknowledge", e),
            };

            if let Err(e) = qa_feedback::records::save_record_store(&store_path, &store) {
                exit_with(EXIT_STORE, "Store error", e);
            }
            tracing::info!(id, agent = %agent, "evaluation acknowledged");

            println!("{}", detail);
        }
        // Handled before config load
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
