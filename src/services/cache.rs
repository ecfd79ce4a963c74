use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Concurrent map whose entries expire after a per-entry TTL.
///
/// Holds at most `capacity` entries. Inserting a new key into a full cache
/// first purges expired entries, then evicts the entry closest to expiry.
pub struct TtlCache<V> {
    entries: DashMap<String, Expiring<V>>,
    capacity: usize,
}

struct Expiring<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Get a live value. Expired entries are evicted on read.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.expires_at > Instant::now() {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    /// Store a value for `ttl`, replacing any previous entry.
    pub fn insert(&self, key: String, value: V, ttl: Duration) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.make_room();
        }
        self.entries.insert(
            key,
            Expiring {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn make_room(&self) {
        self.purge_expired();
        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.expires_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Number of entries that have not expired yet.
    pub fn live_len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_live_entry() {
        let cache = TtlCache::new(8);
        cache.insert("a".to_string(), 1u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = TtlCache::new(8);
        cache.insert("a".to_string(), 1u32, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_keeps_live_entries() {
        let cache = TtlCache::new(8);
        cache.insert("short".to_string(), 1u32, Duration::from_millis(10));
        cache.insert("long".to_string(), 2u32, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.live_len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[test]
    fn test_insert_replaces() {
        let cache = TtlCache::new(1);
        cache.insert("a".to_string(), 1u32, Duration::from_secs(60));
        cache.insert("a".to_string(), 2u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_full_cache_evicts_soonest_to_expire() {
        let cache = TtlCache::new(3);
        cache.insert("a".to_string(), 1u32, Duration::from_secs(30));
        cache.insert("b".to_string(), 2u32, Duration::from_secs(10));
        cache.insert("c".to_string(), 3u32, Duration::from_secs(60));
        cache.insert("d".to_string(), 4u32, Duration::from_secs(60));

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("d"), Some(4));
    }

    #[test]
    fn test_full_cache_drops_expired_first() {
        let cache = TtlCache::new(2);
        cache.insert("stale".to_string(), 1u32, Duration::from_millis(10));
        cache.insert("live".to_string(), 2u32, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));
        cache.insert("new".to_string(), 3u32, Duration::from_secs(60));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("live"), Some(2));
        assert_eq!(cache.get("new"), Some(3));
    }

    #[test]
    fn test_burst_never_exceeds_capacity() {
        let cache = TtlCache::new(16);
        for i in 0..200u32 {
            cache.insert(format!("k{}", i), i, Duration::from_secs(60));
            assert!(cache.len() <= 16);
        }
        assert_eq!(cache.len(), 16);
    }
}
