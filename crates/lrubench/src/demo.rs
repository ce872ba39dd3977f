//! Demonstration runs against small caches

use std::thread;

use anyhow::Result;
use lrucache::{CacheStats, LruCache};
use parking_lot::Mutex;
use tracing::info;

/// Fill a cache past capacity, then read an absent key through
/// `get_or_insert_default`. Returns the keys left, oldest first.
pub fn eviction(capacity: usize) -> Result<Vec<i32>> {
    let mut cache: LruCache<i32, String> = LruCache::new(capacity)?;

    for key in 1..=4 {
        let (_, inserted) = cache.insert(key, key.to_string());
        info!(key, inserted, len = cache.len(), "insert");
    }
    println!("after inserts: {:?}", cache);

    let value = cache.get_or_insert_default(42).clone();
    println!("cache[42] = {:?}", value);
    println!("after access: {:?}", cache);

    Ok(cache.keys().copied().collect())
}

/// Hammer one cache from several threads. The cache does no locking of its
/// own, so every thread takes the whole cache behind a single mutex.
pub fn shared(capacity: usize, threads: usize, ops: usize) -> Result<CacheStats> {
    let cache = Mutex::new(LruCache::<u64, u64>::new(capacity)?);
    let key_space = (capacity as u64).saturating_mul(2).max(1);

    thread::scope(|scope| {
        for worker in 0..threads as u64 {
            let cache = &cache;
            scope.spawn(move || {
                for op in 0..ops as u64 {
                    let key = (op * 7 + worker) % key_space;
                    let mut cache = cache.lock();
                    if cache.get(&key).is_none() {
                        cache.insert(key, worker);
                    }
                }
            });
        }
    });

    let cache = cache.lock();
    let stats = *cache.stats();
    info!(
        threads,
        len = cache.len(),
        hits = stats.hits(),
        misses = stats.misses(),
        evictions = stats.evictions(),
        "shared cache finished"
    );
    println!(
        "shared: {} threads, hit ratio {:.2}, {} evictions",
        threads,
        stats.hit_ratio(),
        stats.evictions()
    );

    Ok(stats)
}
