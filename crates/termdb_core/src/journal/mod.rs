//! Commit journal for durability and crash recovery.
//!
//! Every committed unit of work is one framed record. Opening a store
//! replays the journal from the start into fresh in-memory tables.
//!
//! ## Record Format
//!
//! ```text
//! | magic "TDBJ" (4) | version (2) | kind (1) | length (4) | header crc32 (4) | payload (N) | crc32 (4) |
//! ```
//!
//! The header checksum covers the four fields before it; the trailing
//! checksum covers the whole frame before it.
//!
//! The payload is CBOR. A `Commit` carries the mutations of one unit, a
//! `Snapshot` carries every table and replaces all records before it.
//!
//! ## Recovery Policy
//!
//! Tolerated (treated as a clean end of log and cut away):
//!
//! - fewer than 15 bytes left for a header
//! - a verified length that runs past the end of the journal
//!
//! Fatal (the store refuses to open):
//!
//! - header or payload checksum mismatch
//! - invalid magic bytes
//! - unknown record kind
//! - a version newer than this build writes

mod record;
mod writer;

pub use record::{compute_crc32, RecordKind, JOURNAL_MAGIC, JOURNAL_VERSION};
pub(crate) use record::JournalRecord;
pub(crate) use writer::Journal;
