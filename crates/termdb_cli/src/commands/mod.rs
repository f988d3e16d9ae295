//! Command implementations.

pub mod compact;
pub mod inspect;
pub mod list;
pub mod search;
pub mod verify;

use std::path::Path;
use termdb_core::{Config, Database};
use termdb_storage::{DirFileManager, FileManager};
use thiserror::Error;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Failures reported by the commands themselves.
#[derive(Debug, Error)]
pub enum CliError {
    /// No store with the given name exists in the directory.
    #[error("no store named '{name}' in {dir}")]
    StoreNotFound {
        /// Requested store name.
        name: String,
        /// Directory that was searched.
        dir: String,
    },

    /// Verification found integrity issues.
    #[error("store '{name}' has {issues} integrity issue(s)")]
    IntegrityViolated {
        /// Store name.
        name: String,
        /// Number of issues found.
        issues: usize,
    },
}

/// Opens an existing store; never creates one.
pub fn open_store(
    dir: &Path,
    name: &str,
    config: Config,
) -> Result<Database, Box<dyn std::error::Error>> {
    let files = DirFileManager::new(dir)?;
    if !files.exists(name)? {
        return Err(CliError::StoreNotFound {
            name: name.to_string(),
            dir: dir.display().to_string(),
        }
        .into());
    }
    Ok(Database::open_with_config(
        &files,
        name,
        config.create_if_missing(false),
    )?)
}

/// Opens an existing store without ever modifying its file. A torn tail is
/// skipped in memory and left on disk for the next writable open.
pub fn open_store_read_only(
    dir: &Path,
    name: &str,
    config: Config,
) -> Result<Database, Box<dyn std::error::Error>> {
    open_store(dir, name, config.read_only(true))
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats a byte count with a binary unit.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn byte_formatting() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn missing_store_is_not_created() {
        let dir = tempdir().unwrap();
        let err = open_store(dir.path(), "absent", Config::default()).unwrap_err();
        assert!(err.to_string().contains("absent"));
        assert!(DirFileManager::new(dir.path()).unwrap().list().unwrap().is_empty());
    }

    #[test]
    fn read_only_open_leaves_torn_tail_on_disk() {
        let dir = tempdir().unwrap();
        {
            let files = DirFileManager::new(dir.path()).unwrap();
            let db = Database::open(&files, "tb").unwrap();
            db.termbases()
                .create(&termdb_core::Termbase::new("medical"))
                .unwrap();
        }

        let path = dir.path().join("tb.tdb");
        let mut bytes = std::fs::read(&path).unwrap();
        let head = bytes[..20].to_vec();
        bytes.extend_from_slice(&head);
        std::fs::write(&path, &bytes).unwrap();

        {
            let db = open_store_read_only(dir.path(), "tb", Config::default()).unwrap();
            assert_eq!(db.termbases().get_all().len(), 1);
            assert!(matches!(
                db.termbases().create(&termdb_core::Termbase::new("other")),
                Err(termdb_core::CoreError::ReadOnly)
            ));
            assert!(matches!(db.compact(), Err(termdb_core::CoreError::ReadOnly)));
        }
        assert_eq!(std::fs::read(&path).unwrap(), bytes);

        // A writable open still repairs the tail.
        drop(open_store(dir.path(), "tb", Config::default()).unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, bytes.len() - head.len());
    }
}
