//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to read beyond the end of storage.
    #[error("read beyond end of storage: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current storage size.
        size: u64,
    },

    /// The store is already opened by another owner.
    #[error("store '{name}' is locked by another owner")]
    Locked {
        /// Name of the store.
        name: String,
    },

    /// No store with this name exists.
    #[error("store '{name}' not found")]
    NotFound {
        /// Name of the store.
        name: String,
    },

    /// The store name cannot be mapped to a storage location.
    #[error("invalid store name '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The storage file is corrupted.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}
