//! # TermDB Storage
//!
//! Byte-store backends and the file-manager layer for TermDB.
//!
//! A termbase lives in exactly one named store. This crate supplies the
//! bytes for that store and nothing else: backends are **opaque byte
//! stores** and never interpret the journal written into them.
//!
//! ## Backends
//!
//! - [`InMemoryBackend`] - shared in-process buffer, used by tests
//! - [`FileBackend`] - a single OS file, optionally holding an exclusive lock
//!
//! ## File managers
//!
//! A [`FileManager`] opens stores by name:
//!
//! - [`MemoryFileManager`] - named in-memory buffers that survive reopening
//! - [`DirFileManager`] - `<root>/<name>.tdb` files with advisory locking
//!
//! ## Example
//!
//! ```rust
//! use termdb_storage::{FileManager, MemoryFileManager, StorageBackend};
//!
//! let files = MemoryFileManager::new();
//! let mut backend = files.open("glossary").unwrap();
//! let offset = backend.append(b"hello world").unwrap();
//! assert_eq!(backend.read_at(offset, 5).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod manager;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use manager::{DirFileManager, FileManager, MemoryFileManager, STORE_EXTENSION};
pub use memory::InMemoryBackend;
