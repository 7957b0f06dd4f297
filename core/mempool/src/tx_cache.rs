//! Fixed-capacity duplicate-suppression fence (spec §4.1). Distinct from a
//! working-set cache: recency is never refreshed on lookup, only on
//! insertion, so eviction order is strictly least-recently-inserted.

use linked_hash_map::LinkedHashMap;

use protocol::types::TxKey;

pub struct TxCache {
    capacity: usize,
    entries: LinkedHashMap<TxKey, ()>,
}

impl TxCache {
    pub fn new(capacity: usize) -> Self {
        TxCache {
            capacity,
            entries: LinkedHashMap::new(),
        }
    }

    /// Returns `false` if `key` was already present. Otherwise inserts it
    /// and, if that pushed the cache over capacity, evicts the oldest
    /// entry.
    pub fn push(&mut self, key: TxKey) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, ());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    pub fn remove(&mut self, key: &TxKey) {
        self.entries.remove(key);
    }

    pub fn contains(&self, key: &TxKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
