//! LruCache: hash index over a recency-ordered entry list

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::{Handle, Iter, RecencyList};
use crate::stats::CacheStats;

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// Key/value cache that evicts the least recently used entry when full
///
/// Lookups go through a hash index of [`Handle`]s into a doubly-linked
/// recency list, so lookup, promotion, insertion, eviction and removal
/// are all O(1).
///
/// The cache is not `Clone` and does no locking. `find` and
/// `get` reorder entries, so shared use needs the whole cache behind one
/// lock.
pub struct LruCache<K, V> {
    /// Key -> node in `list`
    map: HashMap<K, Handle, RandomState>,

    /// Entries, least recently used first
    list: RecencyList<K, V>,

    capacity: usize,

    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * [`Error::InvalidCapacity`] if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        let reserve = capacity.min(PREALLOC_LIMIT);
        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            list: RecencyList::with_capacity(reserve),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Insert a key/value pair as the most recently used entry
    ///
    /// An existing key is left untouched: its value is not overwritten and
    /// its recency does not change. The returned flag tells whether a new
    /// entry was created. Use [`get_mut`](Self::get_mut) or
    /// [`get_or_insert_default`](Self::get_or_insert_default) to update.
    ///
    /// Inserting into a full cache evicts the least recently used entry.
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        if let Some(&handle) = self.map.get(&key) {
            return (handle, false);
        }

        let handle = self.list.push_back(key.clone(), value);
        self.map.insert(key, handle);
        self.stats.record_insert();

        // Capacity >= 1, so the victim is never the entry just pushed
        if self.list.len() > self.capacity {
            self.evict();
        }

        (handle, true)
    }

    /// Look up `key` and mark it most recently used
    pub fn find<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.map.get(key) {
            Some(&handle) => {
                self.list.move_to_back(handle);
                self.stats.record_hit();
                Some(handle)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value, promoting it like [`find`](Self::find)
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.find(key)?;
        self.list.get(handle).map(|(_, value)| value)
    }

    /// Get a mutable value, promoting it like [`find`](Self::find)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.find(key)?;
        self.list.get_mut(handle).map(|(_, value)| value)
    }

    /// Get a value without touching recency or stats
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &handle = self.map.get(key)?;
        self.list.get(handle).map(|(_, value)| value)
    }

    /// Get the value for `key`, inserting `V::default()` if absent
    ///
    /// A present entry is promoted to most recently used, same as
    /// [`find`](Self::find). An absent key is inserted, which evicts the
    /// least recently used entry when the cache is full.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Get the value for `key`, inserting `make()` if absent
    ///
    /// Promotion and eviction follow
    /// [`get_or_insert_default`](Self::get_or_insert_default).
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let handle = match self.find(&key) {
            Some(handle) => handle,
            None => self.insert(key, make()).0,
        };

        // Found or just inserted; capacity >= 1 keeps it out of eviction
        let (_, value) = self
            .list
            .get_mut(handle)
            .expect("handle of a live entry must resolve");
        value
    }

    /// Remove `key`, returning whether it was present
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Remove `key` and return its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.map.remove(key)?;
        self.list.remove(handle).map(|(_, value)| value)
    }

    /// Remove and return the least recently used entry
    ///
    /// This is an explicit removal and is not counted as an eviction.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_front()?;
        self.map.remove(&key);
        Some((key, value))
    }

    /// Change the capacity
    ///
    /// Shrinking by `n` evicts the `n` least recently used entries, oldest
    /// first, or everything if fewer are cached. Growing evicts nothing.
    ///
    /// # Errors
    /// * [`Error::InvalidCapacity`] if `capacity` is 0; the cache is left
    ///   unchanged
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        let mut evicted = 0;
        if capacity < self.capacity {
            for _ in 0..self.capacity - capacity {
                if !self.evict() {
                    break;
                }
                evicted += 1;
            }
        }

        debug!(
            from = self.capacity,
            to = capacity,
            evicted,
            len = self.list.len(),
            "resized cache"
        );
        self.capacity = capacity;
        Ok(())
    }

    /// Remove every entry; capacity and stats are kept
    pub fn clear(&mut self) {
        if self.list.len() > 0 {
            debug!(len = self.list.len(), "clearing cache");
        }
        self.map.clear();
        self.list.clear();
    }

    /// Number of entries stored under `key` (0 or 1)
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        usize::from(self.contains_key(key))
    }

    /// Check membership without touching recency
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Least recently used entry, without promoting it
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.front().and_then(|handle| self.list.get(handle))
    }

    /// Most recently used entry
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.list.back().and_then(|handle| self.list.get(handle))
    }

    /// Check internal consistency of index and recency list
    #[doc(hidden)]
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        self.list.check_links()?;

        if self.map.len() != self.list.len() {
            return Err(format!(
                "index has {} keys, list has {} entries",
                self.map.len(),
                self.list.len()
            ));
        }
        if self.list.len() > self.capacity {
            return Err(format!(
                "len {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            ));
        }
        for (key, &handle) in &self.map {
            match self.list.get(handle) {
                Some((stored, _)) if stored == key => {}
                Some(_) => return Err("index handle points at another key".to_string()),
                None => return Err("index handle does not resolve".to_string()),
            }
        }
        Ok(())
    }

    fn evict(&mut self) -> bool {
        match self.list.pop_front() {
            Some((key, _)) => {
                self.map.remove(&key);
                self.stats.record_eviction();
                trace!(
                    len = self.list.len(),
                    capacity = self.capacity,
                    "evicted least recently used entry"
                );
                true
            }
            None => false,
        }
    }
}

impl<K, V> LruCache<K, V> {
    /// Resolve a handle to its entry without promoting it
    pub fn entry(&self, handle: Handle) -> Option<(&K, &V)> {
        self.list.get(handle)
    }

    /// Resolve a handle to its entry with a mutable value
    pub fn entry_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        self.list.get_mut(handle)
    }

    /// Key behind a handle
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.list.get(handle).map(|(key, _)| key)
    }

    /// Value behind a handle
    pub fn value(&self, handle: Handle) -> Option<&V> {
        self.list.get(handle).map(|(_, value)| value)
    }

    /// Iterate from least to most recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset hit/miss/insert/eviction counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a, K, V>(&'a RecencyList<K, V>);

        impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entries<'_, K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &Entries(&self.list))
            .finish()
    }
}
