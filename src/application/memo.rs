// Explicit memoization keyed by generator parameters
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

struct Entry<V> {
    value: Arc<V>,
    created_at: NaiveDateTime,
}

/// Parameter-keyed cache. Entries live until invalidated, or until `ttl`
/// has elapsed when one is configured.
pub struct Memo<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Option<TimeDelta>,
}

impl<K: Eq + Hash, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            ttl: None,
        }
    }

    pub fn with_ttl(ttl: TimeDelta) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// Return the cached value for `key`, generating and storing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        key: K,
        now: NaiveDateTime,
        generate: impl FnOnce() -> V,
    ) -> Arc<V> {
        let ttl = self.ttl;
        if let Some(entry) = self.entries.get(&key) {
            let fresh = ttl.is_none_or(|ttl| now - entry.created_at < ttl);
            if fresh {
                return entry.value.clone();
            }
        }

        let value = Arc::new(generate());
        self.entries.insert(
            key,
            Entry {
                value: value.clone(),
                created_at: now,
            },
        );
        value
    }

    /// Drop one entry. Returns whether anything was cached under `key`.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
