//! Keyed record store used for upload and job bookkeeping.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::RwLock;

/// A record handle: every record sits behind its own lock so concurrent
/// writers to different records never contend, and a reader of one record
/// always observes a whole update.
pub type SharedRecord<V> = Arc<RwLock<V>>;

/// Concurrency-safe keyed map of lockable records.
///
/// The store only guards membership. Field updates go through the record's
/// own lock, which may be held across `.await` points.
pub trait RecordStore<K, V>: Send + Sync + Debug + 'static {
    /// Insert a new record, returning its handle. Replaces any existing
    /// record under the same key.
    fn insert(&self, key: K, record: V) -> SharedRecord<V>;

    /// Look up a record handle.
    fn get(&self, key: &K) -> Option<SharedRecord<V>>;

    /// Remove a record, returning its handle if it was present.
    fn remove(&self, key: &K) -> Option<SharedRecord<V>>;

    /// Point-in-time copy of all keys and handles.
    fn snapshot(&self) -> Vec<(K, SharedRecord<V>)>;

    /// Number of records currently held.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
