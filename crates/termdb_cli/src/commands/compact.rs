//! Compact command implementation.

use super::{format_bytes, open_store, OutputFormat};
use serde::Serialize;
use std::path::Path;
use termdb_core::Config;

/// Compaction outcome.
#[derive(Debug, Serialize)]
pub struct CompactResult {
    /// Whether the journal was left untouched.
    pub dry_run: bool,
    /// Journal size before, in bytes.
    pub bytes_before: u64,
    /// Journal size after, in bytes (unknown on a dry run).
    pub bytes_after: Option<u64>,
    /// Records before.
    pub records_before: u64,
    /// Rows carried into the snapshot.
    pub rows: usize,
}

/// Runs the compact command.
pub fn run(
    dir: &Path,
    store: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store(dir, store, Config::default())?;
    let stats = db.stats()?;

    let result = if dry_run {
        CompactResult {
            dry_run,
            bytes_before: stats.journal_bytes,
            bytes_after: None,
            records_before: stats.journal_records,
            rows: stats.total_rows(),
        }
    } else {
        let compaction = db.compact()?;
        CompactResult {
            dry_run,
            bytes_before: compaction.bytes_before,
            bytes_after: Some(compaction.bytes_after),
            records_before: compaction.records_before,
            rows: stats.total_rows(),
        }
    };

    match format {
        OutputFormat::Json => super::print_json(&result)?,
        OutputFormat::Text => {
            if result.dry_run {
                println!("Dry run - no changes will be made");
            }
            println!(
                "Journal: {} in {} record(s)",
                format_bytes(result.bytes_before),
                result.records_before
            );
            match result.bytes_after {
                Some(after) => println!(
                    "Compacted {} row(s) into one snapshot: {}",
                    result.rows,
                    format_bytes(after)
                ),
                None => println!("Would write {} row(s) into one snapshot", result.rows),
            }
        }
    }
    Ok(())
}
