//! Named store management.
//!
//! A termbase is persisted in a single named store. The engine never deals
//! with paths: it asks a [`FileManager`] for the backend behind a name.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::file::FileBackend;
use crate::memory::InMemoryBackend;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extension used by [`DirFileManager`] for store files.
pub const STORE_EXTENSION: &str = "tdb";

/// Supplies byte storage for named stores.
///
/// Implementations must guarantee exclusive ownership: while a backend
/// returned by `open` is alive, a second `open` of the same name fails
/// with [`StorageError::Locked`].
pub trait FileManager: Send + Sync {
    /// Opens (creating if missing) the store called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if the store is already open,
    /// [`StorageError::InvalidName`] for names that cannot be stored, or an
    /// I/O error.
    fn open(&self, name: &str) -> StorageResult<Box<dyn StorageBackend>>;

    /// Returns whether a store called `name` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or existence cannot be checked.
    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Deletes the store called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such store and
    /// [`StorageError::Locked`] if it is currently open.
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// Lists the names of all stores, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list(&self) -> StorageResult<Vec<String>>;
}

fn validate_name(name: &str) -> StorageResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Keeps named stores in memory.
///
/// Buffers outlive the backends opened on them, so a store can be closed
/// and reopened inside one process. Cloning the manager shares the stores.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileManager {
    stores: Arc<Mutex<BTreeMap<String, Arc<parking_lot::RwLock<Vec<u8>>>>>>,
}

impl MemoryFileManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle on the bytes of a store without taking ownership.
    ///
    /// Tests use this to inspect or damage a store between reopenings. The
    /// returned handle counts as an owner until it is dropped.
    #[must_use]
    pub fn peek(&self, name: &str) -> Option<InMemoryBackend> {
        self.stores
            .lock()
            .get(name)
            .map(|data| InMemoryBackend::from_shared(Arc::clone(data)))
    }
}

impl FileManager for MemoryFileManager {
    fn open(&self, name: &str) -> StorageResult<Box<dyn StorageBackend>> {
        validate_name(name)?;
        let mut stores = self.stores.lock();
        let data = stores.entry(name.to_string()).or_default();

        // The manager keeps one reference; any other means an open backend.
        if Arc::strong_count(data) > 1 {
            return Err(StorageError::Locked {
                name: name.to_string(),
            });
        }

        Ok(Box::new(InMemoryBackend::from_shared(Arc::clone(data))))
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        validate_name(name)?;
        Ok(self.stores.lock().contains_key(name))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        validate_name(name)?;
        let mut stores = self.stores.lock();
        match stores.get(name) {
            None => Err(StorageError::NotFound {
                name: name.to_string(),
            }),
            Some(data) if Arc::strong_count(data) > 1 => Err(StorageError::Locked {
                name: name.to_string(),
            }),
            Some(_) => {
                stores.remove(name);
                Ok(())
            }
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.stores.lock().keys().cloned().collect())
    }
}

/// Maps store names to `<root>/<name>.tdb` files.
///
/// Each open store holds an exclusive lock on `<root>/<name>.tdb.lock`.
#[derive(Debug, Clone)]
pub struct DirFileManager {
    root: PathBuf,
}

impl DirFileManager {
    /// Creates a manager rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or `root` is not
    /// a directory.
    pub fn new(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        if !root.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a directory: {}", root.display()),
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the data file path for a store name.
    #[must_use]
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{STORE_EXTENSION}"))
    }

    fn lock_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{STORE_EXTENSION}.lock"))
    }
}

impl FileManager for DirFileManager {
    fn open(&self, name: &str) -> StorageResult<Box<dyn StorageBackend>> {
        validate_name(name)?;
        let backend = FileBackend::open_locked(&self.store_path(name), &self.lock_path(name))
            .map_err(|e| match e {
                StorageError::Locked { .. } => StorageError::Locked {
                    name: name.to_string(),
                },
                other => other,
            })?;
        tracing::debug!(name, path = %backend.path().display(), "opened store file");
        Ok(Box::new(backend))
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        validate_name(name)?;
        Ok(self.store_path(name).is_file())
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        validate_name(name)?;
        let path = self.store_path(name);
        if !path.is_file() {
            return Err(StorageError::NotFound {
                name: name.to_string(),
            });
        }

        // Holding the lock while removing keeps an open owner from losing its file.
        let backend = FileBackend::open_locked(&path, &self.lock_path(name)).map_err(|e| match e {
            StorageError::Locked { .. } => StorageError::Locked {
                name: name.to_string(),
            },
            other => other,
        })?;
        fs::remove_file(&path)?;
        drop(backend);
        let lock_path = self.lock_path(name);
        if let Err(err) = fs::remove_file(&lock_path) {
            tracing::debug!(path = %lock_path.display(), error = %err, "left stale lock file");
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_survives_reopen() {
        let files = MemoryFileManager::new();
        {
            let mut backend = files.open("glossary").unwrap();
            backend.append(b"abc").unwrap();
        }
        let backend = files.open("glossary").unwrap();
        assert_eq!(backend.read_all().unwrap(), b"abc");
    }

    #[test]
    fn memory_store_is_exclusive() {
        let files = MemoryFileManager::new();
        let first = files.open("glossary").unwrap();
        assert!(matches!(
            files.open("glossary"),
            Err(StorageError::Locked { .. })
        ));
        assert!(matches!(
            files.delete("glossary"),
            Err(StorageError::Locked { .. })
        ));
        drop(first);
        files.delete("glossary").unwrap();
        assert!(!files.exists("glossary").unwrap());
    }

    #[test]
    fn memory_list_and_missing_delete() {
        let files = MemoryFileManager::new();
        drop(files.open("b").unwrap());
        drop(files.open("a").unwrap());
        assert_eq!(files.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(
            files.delete("zzz"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_names_rejected() {
        let files = MemoryFileManager::new();
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                files.open(name),
                Err(StorageError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn dir_manager_round_trip() {
        let dir = tempdir().unwrap();
        let files = DirFileManager::new(dir.path()).unwrap();

        {
            let mut backend = files.open("medical").unwrap();
            backend.append(b"journal").unwrap();
            backend.sync().unwrap();
        }

        assert!(files.exists("medical").unwrap());
        assert_eq!(files.list().unwrap(), vec!["medical".to_string()]);
        assert_eq!(files.open("medical").unwrap().read_all().unwrap(), b"journal");
    }

    #[test]
    fn dir_manager_locks_and_deletes() {
        let dir = tempdir().unwrap();
        let files = DirFileManager::new(dir.path()).unwrap();

        let held = files.open("legal").unwrap();
        assert!(matches!(files.open("legal"), Err(StorageError::Locked { .. })));
        assert!(matches!(files.delete("legal"), Err(StorageError::Locked { .. })));
        drop(held);

        files.delete("legal").unwrap();
        assert!(!files.exists("legal").unwrap());
        assert!(!dir.path().join("legal.tdb.lock").exists());
        assert!(files.list().unwrap().is_empty());
    }
}
