// Property tests over random operation sequences. Each run replays the
// operations against a simple Vec model kept in recency order.

use lrucache::LruCache;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u32, u32),
    Find(u32),
    Peek(u32),
    Assign(u32),
    Erase(u32),
    Resize(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..40, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u32..40).prop_map(Op::Find),
        1 => (0u32..40).prop_map(Op::Peek),
        2 => (0u32..40).prop_map(Op::Assign),
        2 => (0u32..40).prop_map(Op::Erase),
        1 => (1usize..20).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ]
}

/// Reference model: pairs ordered least to most recently used
struct Model {
    entries: Vec<(u32, u32)>,
    capacity: usize,
}

impl Model {
    fn position(&self, key: u32) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn promote(&mut self, key: u32) -> Option<u32> {
        let idx = self.position(key)?;
        let entry = self.entries.remove(idx);
        self.entries.push(entry);
        Some(entry.1)
    }

    fn insert(&mut self, key: u32, value: u32) -> bool {
        if self.position(key).is_some() {
            return false;
        }
        self.entries.push((key, value));
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        true
    }

    fn resize(&mut self, capacity: usize) {
        if capacity < self.capacity {
            let drop = (self.capacity - capacity).min(self.entries.len());
            self.entries.drain(..drop);
        }
        self.capacity = capacity;
    }
}

proptest! {
    #[test]
    fn prop_matches_model(
        capacity in 1usize..20,
        ops in prop::collection::vec(op_strategy(), 0..200)
    ) {
        let mut cache: LruCache<u32, u32> = LruCache::new(capacity).unwrap();
        let mut model = Model { entries: Vec::new(), capacity };

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let (handle, inserted) = cache.insert(k, v);
                    prop_assert_eq!(inserted, model.insert(k, v));
                    let expected = model.entries.iter().find(|(mk, _)| *mk == k).map(|(_, mv)| mv);
                    prop_assert_eq!(cache.value(handle), expected);
                }
                Op::Find(k) => {
                    let found = cache.find(&k).and_then(|h| cache.value(h).copied());
                    prop_assert_eq!(found, model.promote(k));
                }
                Op::Peek(k) => {
                    let expected = model.position(k).map(|idx| model.entries[idx].1);
                    prop_assert_eq!(cache.peek(&k).copied(), expected);
                }
                Op::Assign(k) => {
                    let value = *cache.get_or_insert_default(k);
                    let expected = match model.promote(k) {
                        Some(v) => v,
                        None => {
                            model.insert(k, 0);
                            0
                        }
                    };
                    prop_assert_eq!(value, expected);
                }
                Op::Erase(k) => {
                    let expected = model.position(k).map(|idx| model.entries.remove(idx));
                    prop_assert_eq!(cache.erase(&k), expected.is_some());
                }
                Op::Resize(c) => {
                    cache.resize(c).unwrap();
                    model.resize(c);
                }
                Op::Clear => {
                    cache.clear();
                    model.entries.clear();
                }
            }

            prop_assert!(cache.check_invariants().is_ok(), "{:?}", cache.check_invariants());
            prop_assert!(cache.len() <= cache.capacity());
            let order: Vec<(u32, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(&order, &model.entries);
        }
    }

    #[test]
    fn prop_len_never_exceeds_capacity(
        capacity in 1usize..30,
        keys in prop::collection::vec(0u32..100, 0..200)
    ) {
        let mut cache = LruCache::new(capacity).unwrap();
        for key in keys {
            cache.insert(key, key);
            prop_assert!(cache.len() <= capacity);
        }
    }

    #[test]
    fn prop_distinct_inserts_evict_oldest(capacity in 1usize..30) {
        let mut cache = LruCache::new(capacity).unwrap();
        let n = capacity as u32 + 1;
        for key in 1..=n {
            cache.insert(key, key);
        }

        prop_assert!(!cache.contains_key(&1));
        for key in 2..=n {
            prop_assert!(cache.contains_key(&key));
        }
    }

    #[test]
    fn prop_resize_grow_is_loss_free(capacity in 1usize..20, extra in 1usize..20) {
        let mut cache = LruCache::new(capacity).unwrap();
        for key in 0..capacity {
            cache.insert(key, key);
        }

        cache.resize(capacity + extra).unwrap();
        for key in 0..capacity {
            prop_assert_eq!(cache.get(&key), Some(&key));
        }
        for key in capacity..capacity + extra {
            cache.insert(key, key);
        }

        prop_assert_eq!(cache.len(), capacity + extra);
        prop_assert_eq!(cache.stats().evictions(), 0);
    }
}
