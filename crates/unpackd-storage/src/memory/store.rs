//! In-memory record store implementation using the dashmap crate.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

use unpackd_core::traits::store::{RecordStore, SharedRecord};

/// Sharded concurrent map of lockable records.
pub struct MemoryStore<K, V> {
    /// The underlying map. Shard locks are only held for the duration of a
    /// single map operation, never across an `.await`.
    records: DashMap<K, SharedRecord<V>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> fmt::Debug for MemoryStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl<K, V> RecordStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn insert(&self, key: K, record: V) -> SharedRecord<V> {
        let handle = Arc::new(RwLock::new(record));
        self.records.insert(key, Arc::clone(&handle));
        handle
    }

    fn get(&self, key: &K) -> Option<SharedRecord<V>> {
        self.records.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn remove(&self, key: &K) -> Option<SharedRecord<V>> {
        self.records.remove(key).map(|(_, handle)| handle)
    }

    fn snapshot(&self) -> Vec<(K, SharedRecord<V>)> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
