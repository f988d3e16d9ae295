//! A storage backend with switchable failures.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use termdb_storage::{InMemoryBackend, StorageBackend, StorageError, StorageResult};

#[derive(Debug, Default)]
struct Faults {
    fail_flush: AtomicBool,
    hold_flush: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

/// In-memory bytes whose flushes can be made to fail or to wait.
///
/// Clones share both the bytes and the switches.
#[derive(Debug, Clone, Default)]
pub struct FaultyBackend {
    inner: InMemoryBackend,
    faults: Arc<Faults>,
}

impl FaultyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following flush fail with an I/O error.
    pub fn fail_flushes(&self, fail: bool) {
        self.faults.fail_flush.store(fail, Ordering::SeqCst);
    }

    /// Parks the next flush until the returned sender fires. The returned
    /// receiver fires once that flush has started.
    pub fn hold_next_flush(&self) -> (Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.faults.hold_flush.lock().unwrap() = Some((entered_tx, release_rx));
        (entered_rx, release_tx)
    }

    pub fn data(&self) -> Vec<u8> {
        self.inner.data()
    }
}

impl StorageBackend for FaultyBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        self.inner.read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        self.inner.append(data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        let held = self.faults.hold_flush.lock().unwrap().take();
        if let Some((entered, release)) = held {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }
        if self.faults.fail_flush.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("injected flush failure")));
        }
        self.inner.flush()
    }

    fn size(&self) -> StorageResult<u64> {
        self.inner.size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.inner.sync()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        self.inner.truncate(new_size)
    }

    fn rewrite(&mut self, data: &[u8]) -> StorageResult<()> {
        self.inner.rewrite(data)
    }
}
