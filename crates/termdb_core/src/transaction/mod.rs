//! Atomic units of work.
//!
//! A store has a single writer at a time. Each unit of work is validated
//! against the committed state, written to the journal as one record and
//! then applied, so readers observe either all of it or none of it.

mod manager;
mod state;

pub use manager::CompactionStats;
pub(crate) use manager::TransactionManager;
pub(crate) use state::WriteTransaction;
