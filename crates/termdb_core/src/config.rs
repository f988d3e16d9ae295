//! Store configuration.

/// How `FuzzyMatch` criteria compare text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuzzyMode {
    /// Case-insensitive substring containment.
    #[default]
    Substring,
    /// Substring containment, or a Levenshtein distance of at most
    /// `max_distance` characters to the whole field or to one of its
    /// whitespace-separated tokens.
    EditDistance {
        /// Largest accepted edit distance.
        max_distance: usize,
    },
}

/// Configuration for opening a termbase store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the store if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to error if the store already exists.
    pub error_if_exists: bool,

    /// Whether to flush the journal on every commit.
    pub sync_on_commit: bool,

    /// Compact the journal once it holds this many records (0 = never).
    pub compact_after: u64,

    /// Comparison used by fuzzy search criteria.
    pub fuzzy_mode: FuzzyMode,

    /// Open without ever modifying the journal. Writes fail with
    /// `CoreError::ReadOnly` and a torn tail is skipped instead of cut.
    pub read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            sync_on_commit: true,
            compact_after: 0,
            fuzzy_mode: FuzzyMode::Substring,
            read_only: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to error if the store exists.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets whether to flush the journal on every commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets the journal record count that triggers compaction.
    #[must_use]
    pub const fn compact_after(mut self, records: u64) -> Self {
        self.compact_after = records;
        self
    }

    /// Sets the fuzzy comparison mode.
    #[must_use]
    pub const fn fuzzy_mode(mut self, mode: FuzzyMode) -> Self {
        self.fuzzy_mode = mode;
        self
    }

    /// Sets whether the store is opened read-only.
    #[must_use]
    pub const fn read_only(mut self, value: bool) -> Self {
        self.read_only = value;
        self
    }
}
