//! TTL memoization over a resource tree.
//!
//! Consistency contract: a write to the backing store becomes visible to
//! [`CachedTree::lookup`] within `ttl`. A zero TTL disables memoization.
//! Negative results are cached too, so repeated probes for missing pages
//! stay cheap.
//!
//! Stale entries are removed when looked up. A full sweep of expired entries
//! runs at most once per `ttl`, or once per `ttl / 4` while the cache holds
//! `max_entries`. When the cache is still full afterwards, new answers are
//! returned without being memoized.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

use super::{ResourceRef, ResourceTree};

#[derive(Debug, Clone)]
struct Entry {
    value: Option<ResourceRef>,
    fetched: Instant,
}

/// Default upper bound on memoized names.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Thread-safe lookup cache in front of another [`ResourceTree`].
pub struct CachedTree<T> {
    inner: T,
    ttl: Duration,
    max_entries: usize,
    entries: DashMap<String, Entry>,
    last_sweep: Mutex<Instant>,
}

impl<T: ResourceTree> CachedTree<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
            entries: DashMap::new(),
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Bound the number of memoized names.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Drop the cached answer for one name.
    pub fn invalidate(&self, name: &str) {
        self.entries.remove(name);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of memoized names (fresh or stale).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn is_expired(&self, entry: &Entry) -> bool {
        entry.fetched.elapsed() >= self.ttl
    }

    /// Drop expired entries if a sweep is due. Returns whether there is room for a new one.
    fn make_room(&self) -> bool {
        let full = self.entries.len() >= self.max_entries;
        let interval = if full { self.ttl / 4 } else { self.ttl };

        // Skip if another thread is sweeping
        if let Some(mut last) = self.last_sweep.try_lock()
            && last.elapsed() >= interval
        {
            let before = self.entries.len();
            self.entries.retain(|_, entry| entry.fetched.elapsed() < self.ttl);
            *last = Instant::now();
            crate::debug!("cache"; "swept {} expired entries", before.saturating_sub(self.entries.len()));
        }

        self.entries.len() < self.max_entries
    }
}

impl<T: ResourceTree> ResourceTree for CachedTree<T> {
    fn lookup(&self, name: &str) -> Option<ResourceRef> {
        if self.ttl.is_zero() {
            return self.inner.lookup(name);
        }

        if let Some(entry) = self.entries.get(name)
            && !self.is_expired(&entry)
        {
            return entry.value.clone();
        }
        self.entries.remove_if(name, |_, entry| self.is_expired(entry));

        // Concurrent misses may both query the inner tree; the later insert wins.
        let value = self.inner.lookup(name);
        if self.make_room() {
            self.entries.insert(
                name.to_string(),
                Entry {
                    value: value.clone(),
                    fetched: Instant::now(),
                },
            );
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryTree;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls to the wrapped tree.
    struct Counting {
        tree: MemoryTree,
        hits: AtomicUsize,
    }

    impl ResourceTree for Counting {
        fn lookup(&self, name: &str) -> Option<ResourceRef> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.tree.lookup(name)
        }
    }

    fn counting(names: &[&str]) -> Arc<Counting> {
        Arc::new(Counting {
            tree: MemoryTree::with_names(names),
            hits: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_memoizes_within_ttl() {
        let inner = counting(&["/a.jspx"]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_secs(60));

        assert!(cache.lookup("/a.jspx").is_some());
        assert!(cache.lookup("/a.jspx").is_some());
        assert!(cache.lookup("/b.jspx").is_none());
        assert!(cache.lookup("/b.jspx").is_none());

        assert_eq!(inner.hits.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_stale_answer_until_invalidated() {
        let inner = counting(&[]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_secs(60));

        assert!(cache.lookup("/new.jspx").is_none());
        inner.tree.insert("/new.jspx");
        assert!(cache.lookup("/new.jspx").is_none());

        cache.invalidate("/new.jspx");
        assert!(cache.lookup("/new.jspx").is_some());
    }

    #[test]
    fn test_expired_entry_is_refetched() {
        let inner = counting(&[]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_millis(10));

        assert!(cache.lookup("/late.jspx").is_none());
        inner.tree.insert("/late.jspx");
        std::thread::sleep(Duration::from_millis(30));

        assert!(cache.lookup("/late.jspx").is_some());
        assert_eq!(inner.hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_ttl_passes_through() {
        let inner = counting(&["/a.jspx"]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::ZERO);

        cache.lookup("/a.jspx");
        cache.lookup("/a.jspx");
        assert_eq!(inner.hits.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let inner = counting(&[]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_millis(5));

        for i in 0..50_000 {
            cache.lookup(&format!("/missing-{i}.jspx"));
        }
        assert!(cache.len() <= DEFAULT_MAX_ENTRIES);

        std::thread::sleep(Duration::from_millis(20));
        cache.lookup("/one-more.jspx");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stale_entry_removed_on_lookup() {
        let inner = counting(&["/a.jspx"]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_millis(5))
            .with_max_entries(8);
        cache.lookup("/a.jspx");
        inner.tree.remove("/a.jspx");
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.lookup("/a.jspx").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_full_cache_still_answers() {
        let inner = counting(&["/a.jspx", "/b.jspx", "/c.jspx"]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_secs(60))
            .with_max_entries(2);

        assert!(cache.lookup("/a.jspx").is_some());
        assert!(cache.lookup("/b.jspx").is_some());
        // Every entry is fresh, so the third answer is not memoized
        assert!(cache.lookup("/c.jspx").is_some());
        assert_eq!(cache.len(), 2);
        assert!(cache.lookup("/c.jspx").is_some());
        assert_eq!(inner.hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_clear() {
        let inner = counting(&["/a.jspx"]);
        let cache = CachedTree::new(Arc::clone(&inner), Duration::from_secs(60));
        cache.lookup("/a.jspx");
        cache.clear();
        assert!(cache.is_empty());
    }
}
