//! Verify command implementation.

use super::{open_store_read_only, CliError, OutputFormat};
use std::path::Path;
use termdb_core::Config;

/// Runs the verify command.
///
/// Opening the store already checks every journal checksum; the
/// integrity pass then checks references between rows.
pub fn run(dir: &Path, store: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store_read_only(dir, store, Config::default())?;
    let report = db.verify();

    match format {
        OutputFormat::Json => super::print_json(&report)?,
        OutputFormat::Text => {
            println!("Verifying store '{store}' in {}", dir.display());
            println!();
            println!("Journal:   OK ({} records)", db.stats()?.journal_records);
            if report.is_clean() {
                println!("Integrity: OK");
            } else {
                println!("Integrity: {} issue(s)", report.issues.len());
                for issue in &report.issues {
                    println!("  - {issue}");
                }
            }
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::IntegrityViolated {
            name: store.to_string(),
            issues: report.issues.len(),
        }
        .into())
    }
}
