//! # TermDB Core
//!
//! Embedded engine for multilingual terminology databases.
//!
//! This crate provides:
//! - The termbase model: termbases, languages, entries, terms
//! - A per-termbase schema of typed properties and picklist values
//! - Entity-attribute-value storage of property values
//! - Cascading deletes committed as single atomic units
//! - A checksummed journal with crash recovery and compaction
//! - Structured search with exact and fuzzy criteria

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cascade;
mod config;
mod database;
mod error;
mod journal;
mod model;
mod schema;
mod search;
mod state;
mod stats;
mod store;
mod transaction;
mod types;
mod values;

pub use config::{Config, FuzzyMode};
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use journal::{compute_crc32, RecordKind, JOURNAL_MAGIC, JOURNAL_VERSION};
pub use model::{
    Entry, EntityKind, Language, LemmaPolicy, OwnerRef, PicklistValue, Property, PropertyLevel,
    PropertyType, PropertyValue, Term, Termbase,
};
pub use schema::{PicklistValueStore, SchemaRegistry};
pub use search::{MatchDescriptor, SearchCriterion, SearchEngine, TermWithContext};
pub use state::{IntegrityIssue, IntegrityReport, TableCounts};
pub use stats::DatabaseStats;
pub use store::{EntryStore, LanguageStore, TermStore, TermbaseStore};
pub use transaction::CompactionStats;
pub use types::{
    EntryId, LanguageId, PicklistValueId, PropertyId, PropertyValueId, SequenceNumber, TermId,
    TermbaseId,
};
pub use values::PropertyValueStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
