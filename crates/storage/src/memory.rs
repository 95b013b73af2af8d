//! MemoryStore: in-process `StateStore` backed by a BTreeMap
//!
//! # Design Notes
//!
//! - **Encoded records**: values are stored as codec bytes, never as live
//!   objects, so a record read back is always a fresh copy.
//! - **Per-call atomicity only**: each call takes the lock once. Nothing
//!   spans calls, which is exactly the contract the engines are written
//!   against.
//! - **Counters**: `AtomicU64` counters track every call so tests can assert
//!   how many records an operation touched.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use stateful_core::{Error, Result, StateStore};

use crate::codec;

/// Snapshot of `MemoryStore` operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// `contains` calls
    pub contains: u64,
    /// `try_get`/`get` calls
    pub reads: u64,
    /// `set` calls
    pub writes: u64,
    /// Successful `add` calls
    pub adds: u64,
    /// Records actually removed by `remove`/`try_remove`
    pub removes: u64,
}

#[derive(Debug, Default)]
struct Counters {
    contains: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
    adds: AtomicU64,
    removes: AtomicU64,
}

/// In-memory key/value store
///
/// Thread-safe through `parking_lot::RwLock`. Keys are kept ordered so
/// `keys()` returns a stable listing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
    counters: Counters,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Sorted snapshot of every key in the store
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Current operation counters
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            contains: self.counters.contains.load(Ordering::Relaxed),
            reads: self.counters.reads.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            adds: self.counters.adds.load(Ordering::Relaxed),
            removes: self.counters.removes.load(Ordering::Relaxed),
        }
    }

    /// Reset all operation counters to zero
    pub fn reset_stats(&self) {
        self.counters.contains.store(0, Ordering::Relaxed);
        self.counters.reads.store(0, Ordering::Relaxed);
        self.counters.writes.store(0, Ordering::Relaxed);
        self.counters.adds.store(0, Ordering::Relaxed);
        self.counters.removes.store(0, Ordering::Relaxed);
    }
}

impl StateStore for MemoryStore {
    async fn contains(&self, name: &str) -> Result<bool> {
        self.counters.contains.fetch_add(1, Ordering::Relaxed);
        Ok(self.data.read().contains_key(name))
    }

    async fn try_get<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        let data = self.data.read();
        match data.get(name) {
            Some(bytes) => Ok(Some(codec::decode(bytes)?)),
            None => Ok(None),
        }
    }

    async fn set<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = codec::encode(value)?;
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        trace!(key = name, len = bytes.len(), "set");
        self.data.write().insert(name.to_string(), bytes);
        Ok(())
    }

    async fn add<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = codec::encode(value)?;
        let mut data = self.data.write();
        if data.contains_key(name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        self.counters.adds.fetch_add(1, Ordering::Relaxed);
        trace!(key = name, len = bytes.len(), "add");
        data.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn try_remove(&self, name: &str) -> Result<bool> {
        let removed = self.data.write().remove(name).is_some();
        if removed {
            self.counters.removes.fetch_add(1, Ordering::Relaxed);
            trace!(key = name, "remove");
        }
        Ok(removed)
    }
}
