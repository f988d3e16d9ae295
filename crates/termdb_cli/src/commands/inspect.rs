//! Inspect command implementation.

use super::{format_bytes, open_store_read_only, OutputFormat};
use serde::Serialize;
use std::path::Path;
use termdb_core::{Config, Database, DatabaseStats};

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Figures of the whole store.
    pub stats: DatabaseStats,
    /// Termbase summaries (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termbases: Option<Vec<TermbaseSummary>>,
}

/// Term counts of one termbase.
#[derive(Debug, Serialize)]
pub struct TermbaseSummary {
    /// Termbase id.
    pub id: u64,
    /// Termbase name.
    pub name: String,
    /// Total number of terms.
    pub terms: usize,
    /// Terms per language code, in language id order.
    pub languages: Vec<(String, usize)>,
}

/// Runs the inspect command.
pub fn run(
    dir: &Path,
    store: &str,
    show_termbases: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store_read_only(dir, store, Config::default())?;
    let result = InspectResult {
        stats: db.stats()?,
        termbases: show_termbases.then(|| summarize(&db)),
    };

    match format {
        OutputFormat::Json => super::print_json(&result)?,
        OutputFormat::Text => print_text_output(&result),
    }
    Ok(())
}

fn summarize(db: &Database) -> Vec<TermbaseSummary> {
    let search = db.search();
    db.termbases()
        .get_all()
        .into_iter()
        .map(|tb| TermbaseSummary {
            id: tb.id.as_u64(),
            terms: search.count_all(tb.id),
            languages: db
                .languages()
                .get_all(tb.id)
                .into_iter()
                .map(|lang| {
                    let count = search.count_by_language(&lang.code, tb.id);
                    (lang.code, count)
                })
                .collect(),
            name: tb.name,
        })
        .collect()
}

fn print_text_output(result: &InspectResult) {
    let stats = &result.stats;
    let tables = &stats.tables;
    println!("TermDB Store: {}", stats.name.as_deref().unwrap_or("<unnamed>"));
    println!("========================================");
    println!();
    println!("Journal:");
    println!("  Size:            {}", format_bytes(stats.journal_bytes));
    println!("  Records:         {}", stats.journal_records);
    println!("  Last sequence:   {}", stats.sequence);
    println!();
    println!("Rows:");
    println!("  Termbases:       {}", tables.termbases);
    println!("  Languages:       {}", tables.languages);
    println!("  Entries:         {}", tables.entries);
    println!("  Terms:           {}", tables.terms);
    println!("  Properties:      {}", tables.properties);
    println!("  Picklist values: {}", tables.picklist_values);
    println!("  Property values: {}", tables.property_values);
    println!("  Total:           {}", stats.total_rows());

    if let Some(termbases) = &result.termbases {
        println!();
        println!("Termbases:");
        for tb in termbases {
            println!("  [{}] {} - {} term(s)", tb.id, tb.name, tb.terms);
            for (code, count) in &tb.languages {
                println!("      {code:<8} {count}");
            }
        }
    }
}
