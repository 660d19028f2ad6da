//! Keyed async locks
//!
//! Serializes operations on a single resource (one product, one order)
//! while leaving different resources free to proceed concurrently.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock map size warning threshold
const LOCK_MAP_WARN_THRESHOLD: usize = 10_000;

/// A map of per-key async mutexes.
///
/// Entries are created on first use and kept for the lifetime of the map;
/// the set of keys is bounded by the catalog/order population of the
/// process.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for `key`, waiting if another task holds it.
    ///
    /// The entry's `Arc` is cloned out of the map before awaiting so the
    /// map shard is never held across an await point.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let entry = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        if self.locks.len() > LOCK_MAP_WARN_THRESHOLD {
            tracing::warn!(
                lock_count = self.locks.len(),
                "Keyed lock map exceeds threshold"
            );
        }
        entry.lock_owned().await
    }
}
