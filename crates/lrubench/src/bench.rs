//! Insert/find timing of LruCache next to std containers

use std::collections::{BTreeMap, HashMap, LinkedList};
use std::hint::black_box;
use std::time::Instant;

use anyhow::Result;
use lrucache::LruCache;
use serde::Serialize;
use tracing::debug;

/// One timed loop
#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    pub container: String,
    pub operation: &'static str,
    pub micros: u64,
}

/// All timings of a run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub elements: usize,
    pub capacity: usize,
    pub timings: Vec<Timing>,
}

impl Report {
    /// Print one section per operation
    pub fn print(&self) {
        for operation in ["insert", "find"] {
            println!("---------- {} ----------", operation);
            for timing in self.timings.iter().filter(|t| t.operation == operation) {
                println!(
                    "{:<20} {} x {}: {} microseconds",
                    timing.container, operation, self.elements, timing.micros
                );
            }
        }
    }
}

/// Run every insert and find loop over `elements` integer keys
pub fn run(elements: usize, capacity: usize) -> Result<Report> {
    let keys: Vec<u64> = (0..elements as u64).collect();
    let lru_name = format!("LruCache({})", capacity);
    let mut timings = Vec::new();

    // Insert
    let mut lru = LruCache::new(capacity)?;
    timings.push(time(&lru_name, "insert", || {
        for &k in &keys {
            black_box(lru.insert(k, k));
        }
    }));

    let mut hash_map = HashMap::new();
    timings.push(time("HashMap", "insert", || {
        for &k in &keys {
            black_box(hash_map.insert(k, k));
        }
    }));

    let mut btree_map = BTreeMap::new();
    timings.push(time("BTreeMap", "insert", || {
        for &k in &keys {
            black_box(btree_map.insert(k, k));
        }
    }));

    let mut list = LinkedList::new();
    timings.push(time("LinkedList", "insert", || {
        for &k in &keys {
            list.push_back(k);
        }
    }));

    let mut vec = Vec::new();
    timings.push(time("Vec", "insert", || {
        for &k in &keys {
            vec.push(k);
        }
    }));

    // Find, reusing the filled containers
    timings.push(time(&lru_name, "find", || {
        for k in &keys {
            black_box(lru.find(k));
        }
    }));

    timings.push(time("HashMap", "find", || {
        for k in &keys {
            black_box(hash_map.get(k));
        }
    }));

    timings.push(time("BTreeMap", "find", || {
        for k in &keys {
            black_box(btree_map.get(k));
        }
    }));

    timings.push(time("LinkedList", "find", || {
        for k in &keys {
            black_box(list.iter().find(|&v| v == k));
        }
    }));

    timings.push(time("Vec", "find", || {
        for k in &keys {
            black_box(vec.iter().find(|&v| v == k));
        }
    }));

    debug!(
        hits = lru.stats().hits(),
        misses = lru.stats().misses(),
        evictions = lru.stats().evictions(),
        "lru stats after run"
    );

    Ok(Report {
        elements,
        capacity,
        timings,
    })
}

fn time<F: FnOnce()>(container: &str, operation: &'static str, f: F) -> Timing {
    let start = Instant::now();
    f();
    let micros = start.elapsed().as_micros() as u64;
    debug!(container, operation, micros, "timed loop");

    Timing {
        container: container.to_string(),
        operation,
        micros,
    }
}
