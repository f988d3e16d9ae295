//! Store statistics.

use crate::state::TableCounts;
use crate::types::SequenceNumber;
use serde::Serialize;

/// Point-in-time figures of an open store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    /// Store name, if opened through a file manager.
    pub name: Option<String>,
    /// Rows per table.
    pub tables: TableCounts,
    /// Journal size in bytes.
    pub journal_bytes: u64,
    /// Records in the journal.
    pub journal_records: u64,
    /// Sequence of the last commit.
    pub sequence: SequenceNumber,
}

impl DatabaseStats {
    /// Total number of rows across all tables.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        let t = &self.tables;
        t.termbases
            + t.languages
            + t.entries
            + t.terms
            + t.properties
            + t.picklist_values
            + t.property_values
    }
}
