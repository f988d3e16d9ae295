//! List command implementation.

use super::OutputFormat;
use std::path::Path;
use termdb_storage::{DirFileManager, FileManager};

/// Runs the list command.
pub fn run(dir: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let files = DirFileManager::new(dir)?;
    let names = files.list()?;

    match format {
        OutputFormat::Json => super::print_json(&names)?,
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No stores in {}", dir.display());
            }
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}
