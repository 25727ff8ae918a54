//! Persisted per-key counter store.
//!
//! Counts live in a [`Ledger`]: one in-memory mapping per persistence path,
//! shared by every [`CounterStore`] in the process that points at that path.
//! Stores sharing a path therefore observe the union of all keys any of
//! them has incremented, while stores pointed at different paths (as tests
//! do with temporary directories) are fully isolated.
//!
//! # Update protocol
//!
//! [`CounterStore::increment_and_get`] runs in two phases:
//!
//! 1. Under the mapping lock, seed the key with the store's initial seed if
//!    it is absent, add one, and capture the new value.
//! 2. With the mapping lock released, take the ledger's write lock, copy the
//!    current mapping and write it to disk.
//!
//! Because the copy is taken inside the write lock, each write contains
//! every increment that completed before it started, and writes can never
//! land out of order. The caller gets its value only after its write
//! finished.
//!
//! ```text
//!   hit("a") ──► [ counters lock ] seed/+1 ──► [ write lock ] copy + write ──► 43
//!   hit("b") ──► [ counters lock ] seed/+1 ──► ........ waits ........ ──► [ write lock ] ...
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use hitcounter::store::CounterStore;
//!
//! let store = CounterStore::new("hitcounters.json", 100);
//! store.load();
//!
//! assert_eq!(store.increment_and_get("index").unwrap(), 101);
//! assert_eq!(store.increment_and_get("index").unwrap(), 102);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{IncrementError, PersistenceError, SnapshotReadError};
use crate::snapshot::{read_snapshot, write_snapshot, Snapshot};

/// Live ledgers, keyed by persistence path.
///
/// Entries are weak so a ledger is dropped together with its last store.
static LEDGERS: Lazy<Mutex<HashMap<PathBuf, Weak<Ledger>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The process-wide mapping for one persistence path.
///
/// The mapping is only reachable through the lock; there is no way to get
/// an unguarded reference to it.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    counters: Mutex<HashMap<String, u64>>,
    write_lock: Mutex<()>,
}

impl Ledger {
    /// Returns the ledger for `path`, creating an empty one if no store in
    /// this process currently uses it.
    pub fn shared(path: impl Into<PathBuf>) -> Arc<Ledger> {
        let path = path.into();
        let mut ledgers = LEDGERS.lock();

        if let Some(ledger) = ledgers.get(&path).and_then(Weak::upgrade) {
            return ledger;
        }

        ledgers.retain(|_, weak| weak.strong_count() > 0);
        let ledger = Arc::new(Ledger {
            path: path.clone(),
            counters: Mutex::new(HashMap::new()),
            write_lock: Mutex::new(()),
        });
        ledgers.insert(path, Arc::downgrade(&ledger));
        ledger
    }

    /// Returns the persistence path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merges `snapshot` into the mapping, keeping the larger count for keys
    /// present on both sides.
    fn merge(&self, snapshot: Snapshot) {
        let mut counters = self.counters.lock();
        for (key, count) in snapshot {
            let slot = counters.entry(key).or_insert(0);
            *slot = (*slot).max(count);
        }
    }

    /// Seeds `key` if absent, increments it and returns the new value.
    ///
    /// Saturates at `u64::MAX`.
    fn increment(&self, key: &str, seed: u64) -> u64 {
        let mut counters = self.counters.lock();
        let slot = counters.entry(key.to_owned()).or_insert(seed);
        if *slot == u64::MAX {
            warn!(key, "counter saturated at u64::MAX");
        }
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Writes the current mapping to disk.
    fn persist(&self) -> Result<(), PersistenceError> {
        let _writer = self.write_lock.lock();
        let snapshot = self.snapshot();
        write_snapshot(&self.path, &snapshot)
    }

    /// Returns a copy of the current mapping.
    pub fn snapshot(&self) -> Snapshot {
        let counters = self.counters.lock();
        counters.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    fn get(&self, key: &str) -> Option<u64> {
        self.counters.lock().get(key).copied()
    }

    fn len(&self) -> usize {
        self.counters.lock().len()
    }
}

/// A view on a shared [`Ledger`] with its own initial seed.
///
/// Cloning is cheap; clones share the ledger.
#[derive(Debug, Clone)]
pub struct CounterStore {
    ledger: Arc<Ledger>,
    initial_seed: u64,
}

impl CounterStore {
    /// Attaches to the ledger for `path`.
    ///
    /// Nothing is read from disk until [`load`](Self::load) is called.
    pub fn new(path: impl Into<PathBuf>, initial_seed: u64) -> Self {
        Self {
            ledger: Ledger::shared(path),
            initial_seed,
        }
    }

    /// Merges the persisted snapshot into the ledger.
    ///
    /// A missing snapshot is a normal first start. An unreadable or corrupt
    /// snapshot is logged and otherwise ignored: the ledger keeps whatever
    /// it already holds.
    pub fn load(&self) {
        let path = self.ledger.path();
        match read_snapshot(path) {
            Ok(snapshot) => {
                info!(path = %path.display(), keys = snapshot.len(), "loaded hit counters");
                self.ledger.merge(snapshot);
            }
            Err(SnapshotReadError::NotFound(_)) => {
                debug!(path = %path.display(), "no hit counter snapshot, starting empty");
            }
            Err(err) => {
                warn!(error = %err, "ignoring unreadable hit counter snapshot, starting empty");
            }
        }
    }

    /// Increments `key` and returns its new value.
    ///
    /// A key seen for the first time starts at the initial seed, so its
    /// first returned value is `initial_seed + 1`. The full mapping is
    /// written to disk before returning.
    ///
    /// # Errors
    ///
    /// Returns [`IncrementError`] if the snapshot could not be written. The
    /// in-memory increment is kept and the new value is available in
    /// [`IncrementError::count`].
    pub fn increment_and_get(&self, key: &str) -> Result<u64, IncrementError> {
        let count = self.ledger.increment(key, self.initial_seed);
        debug!(key, count, "hit counter incremented");

        self.ledger.persist().map_err(|source| {
            warn!(key, count, error = %source, "failed to persist hit counters");
            IncrementError { count, source }
        })?;
        Ok(count)
    }

    /// Returns the current count for `key`, if it has ever been incremented.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.ledger.get(key)
    }

    /// Returns a copy of the whole mapping.
    pub fn snapshot(&self) -> Snapshot {
        self.ledger.snapshot()
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    /// Returns `true` if no key has been incremented or loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the persistence path.
    pub fn path(&self) -> &Path {
        self.ledger.path()
    }

    /// Returns the seed applied to unseen keys.
    pub fn initial_seed(&self) -> u64 {
        self.initial_seed
    }

    /// Returns the shared ledger.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }
}
