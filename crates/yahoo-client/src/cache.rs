use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::hash::Hash;

/// Cached value with the moment it was stored
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Concurrent map whose entries expire after a fixed time-to-live
pub(crate) struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fresh value for `key`; a stale entry is evicted instead.
    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if Utc::now() - entry.cached_at < self.ttl => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub(crate) fn insert(&self, key: K, data: V) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                cached_at: Utc::now(),
            },
        );
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_served() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::minutes(15));
        cache.insert("SBIN.NS".to_string(), 7);
        assert_eq!(cache.get(&"SBIN.NS".to_string()), Some(7));
        assert_eq!(cache.get(&"ITC.NS".to_string()), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::zero());
        cache.insert("SBIN.NS", 7);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"SBIN.NS"), None);
        assert_eq!(cache.len(), 0);
    }
}
