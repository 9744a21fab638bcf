//! The `interviewbot history` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use interviewbot_core::model::{Evaluation, SessionRecord};
use interviewbot_providers::config::load_config_from;
use interviewbot_store::SessionStore;

/// Longest answer excerpt shown in the table.
const ANSWER_PREVIEW_CHARS: usize = 60;

pub fn execute(limit: u32, database: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let database = match database {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.database_path,
    };

    let store = SessionStore::new(&database);
    store
        .initialize()
        .with_context(|| format!("failed to open database: {}", database.display()))?;

    let records = store.recent(limit)?;
    if records.is_empty() {
        println!("No sessions recorded in {}.", database.display());
        return Ok(());
    }

    print_records(&records);
    println!("{} of {} session(s) shown.", records.len(), store.count()?);
    Ok(())
}

fn print_records(records: &[SessionRecord]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["ID", "Created", "Score", "Answer"]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(score_label(&record.evaluation)),
            Cell::new(preview(&record.answer)),
        ]);
    }

    println!("{table}");
}

/// Score from the stored evaluation JSON, or "?" when it has none.
fn score_label(evaluation: &str) -> String {
    serde_json::from_str::<serde_json::Value>(evaluation)
        .ok()
        .map(Evaluation::Model)
        .and_then(|e| e.as_result())
        .map(|r| format!("{:.1}", r.score))
        .unwrap_or_else(|| "?".to_string())
}

fn preview(answer: &str) -> String {
    let flat = answer.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > ANSWER_PREVIEW_CHARS {
        let cut: String = flat.chars().take(ANSWER_PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        flat
    }
}
