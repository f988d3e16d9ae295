//! Database facade and recovery.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::journal::Journal;
use crate::schema::{PicklistValueStore, SchemaRegistry};
use crate::search::SearchEngine;
use crate::state::IntegrityReport;
use crate::stats::DatabaseStats;
use crate::store::{EntryStore, LanguageStore, TermStore, TermbaseStore};
use crate::transaction::{CompactionStats, TransactionManager};
use crate::types::SequenceNumber;
use crate::values::PropertyValueStore;
use termdb_storage::{FileManager, InMemoryBackend, StorageBackend};

/// An open termbase store.
///
/// A `Database` is an explicit handle on one named store; there is no
/// global state. It is `Send + Sync` and is shared between threads by
/// reference or through an `Arc`. Writes are serialized, reads run
/// concurrently and always see whole units of work.
///
/// A store holds exactly one termbase, so each termbase has its own handle
/// and writer lock and writes to different termbases never wait on each
/// other.
///
/// # Example
///
/// ```rust
/// use termdb_core::{Database, Entry, Language, Term, Termbase, SearchCriterion};
/// use termdb_storage::MemoryFileManager;
///
/// let files = MemoryFileManager::new();
/// let db = Database::open(&files, "glossary")?;
///
/// let tb = db.termbases().create(&Termbase::new("medical"))?;
/// db.languages().create(&Language::new("en", tb))?;
/// let entry = db.entries().create(&Entry::new(tb))?;
/// db.terms().create(&Term::new(entry, "fever", "en"))?;
///
/// let hits = db.search().get_all(tb, "en", &[SearchCriterion::fuzzy("fev", "en")]);
/// assert_eq!(hits.len(), 1);
/// # Ok::<(), termdb_core::CoreError>(())
/// ```
pub struct Database {
    name: Option<String>,
    config: Config,
    tm: TransactionManager,
}

impl Database {
    /// Opens (or creates) the store called `name` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is locked by another owner, its
    /// journal is corrupted or I/O fails.
    pub fn open(files: &dyn FileManager, name: &str) -> CoreResult<Self> {
        Self::open_with_config(files, name, Config::default())
    }

    /// Opens the store called `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the store is missing and
    /// `create_if_missing` is off or `read_only` is on, or present and
    /// `error_if_exists` is on, and the errors of [`Database::open`].
    pub fn open_with_config(files: &dyn FileManager, name: &str, config: Config) -> CoreResult<Self> {
        let exists = files.exists(name)?;
        if exists && config.error_if_exists {
            return Err(CoreError::invalid_format(format!(
                "store '{name}' already exists"
            )));
        }
        if !exists && (config.read_only || !config.create_if_missing) {
            return Err(CoreError::invalid_format(format!(
                "store '{name}' does not exist"
            )));
        }

        let backend = files.open(name)?;
        Self::open_inner(Some(name.to_string()), backend, config)
    }

    /// Opens a store over an existing backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal is corrupted or cannot be read.
    pub fn open_with_backend(backend: Box<dyn StorageBackend>, config: Config) -> CoreResult<Self> {
        Self::open_inner(None, backend, config)
    }

    /// Opens an empty, private in-memory store.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other openers.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_backend(Box::new(InMemoryBackend::new()), Config::default())
    }

    fn open_inner(
        name: Option<String>,
        backend: Box<dyn StorageBackend>,
        config: Config,
    ) -> CoreResult<Self> {
        let journal = Journal::new(backend, config.sync_on_commit);
        let (tm, info) = TransactionManager::recover(journal, config.compact_after, config.read_only)?;
        tracing::info!(
            store = name.as_deref().unwrap_or("<memory>"),
            records = info.records,
            sequence = %info.sequence,
            truncated_bytes = info.truncated_bytes,
            read_only = config.read_only,
            "opened termbase store"
        );
        Ok(Self { name, config, tm })
    }

    /// Store name, if opened through a file manager.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sequence number of the last commit.
    #[must_use]
    pub fn committed_seq(&self) -> SequenceNumber {
        self.tm.committed_seq()
    }

    /// Termbase store.
    #[must_use]
    pub fn termbases(&self) -> TermbaseStore<'_> {
        TermbaseStore::new(&self.tm)
    }

    /// Language store.
    #[must_use]
    pub fn languages(&self) -> LanguageStore<'_> {
        LanguageStore::new(&self.tm)
    }

    /// Entry store.
    #[must_use]
    pub fn entries(&self) -> EntryStore<'_> {
        EntryStore::new(&self.tm)
    }

    /// Term store.
    #[must_use]
    pub fn terms(&self) -> TermStore<'_> {
        TermStore::new(&self.tm)
    }

    /// Property definitions.
    #[must_use]
    pub fn schema(&self) -> SchemaRegistry<'_> {
        SchemaRegistry::new(&self.tm)
    }

    /// Picklist value store.
    #[must_use]
    pub fn picklist_values(&self) -> PicklistValueStore<'_> {
        PicklistValueStore::new(&self.tm)
    }

    /// Property value store.
    #[must_use]
    pub fn property_values(&self) -> PropertyValueStore<'_> {
        PropertyValueStore::new(&self.tm)
    }

    /// Search engine.
    #[must_use]
    pub fn search(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.tm, self.config.fuzzy_mode)
    }

    /// Returns row counts and journal figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal size cannot be read.
    pub fn stats(&self) -> CoreResult<DatabaseStats> {
        Ok(DatabaseStats {
            name: self.name.clone(),
            tables: self.tm.read(|state| state.counts()),
            journal_bytes: self.tm.journal_size()?,
            journal_records: self.tm.record_count(),
            sequence: self.tm.committed_seq(),
        })
    }

    /// Checks every referential invariant of the stored data.
    #[must_use]
    pub fn verify(&self) -> IntegrityReport {
        self.tm.read(|state| state.check_integrity())
    }

    /// Rewrites the journal as a single snapshot record.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written; the old journal
    /// is left in place.
    pub fn compact(&self) -> CoreResult<CompactionStats> {
        self.tm.compact()
    }

    /// Flushes and syncs the journal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be synced.
    pub fn sync(&self) -> CoreResult<()> {
        self.tm.sync()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("committed_seq", &self.committed_seq())
            .finish_non_exhaustive()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(err) = self.tm.sync() {
            tracing::warn!(error = %err, "failed to sync journal on close");
        }
    }
}
