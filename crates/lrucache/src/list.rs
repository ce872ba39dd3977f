//! Recency-ordered entry list
//!
//! Entries live in a slot arena and are chained into a doubly-linked list
//! by slot index. Front is the least recently used entry, back the most
//! recently used. A [`Handle`] carries the slot's generation, so it keeps
//! naming the same entry while others are inserted or removed, and stops
//! resolving once its own entry is gone.

/// Stable reference to an entry in an [`LruCache`](crate::LruCache)
///
/// Handles are cheap to copy. A handle whose entry has been evicted,
/// erased or cleared resolves to nothing, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u64,
}

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Slot<K, V> {
    generation: u64,
    node: Option<Node<K, V>>,
}

/// Doubly-linked list over a slot arena with a free list for reuse
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append an entry at the most recently used end
    pub(crate) fn push_back(&mut self, key: K, value: V) -> Handle {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };

        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx].node = Some(node);
                idx
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        self.link_back(idx);
        self.len += 1;

        Handle {
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }

    /// Remove the least recently used entry
    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        let idx = self.head?;
        self.release(idx)
    }

    /// Remove the entry named by `handle`
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        self.resolve(handle)?;
        self.release(handle.slot)
    }

    /// Relocate an entry to the most recently used end without moving it
    /// in memory
    pub(crate) fn move_to_back(&mut self, handle: Handle) -> bool {
        if self.resolve(handle).is_none() {
            return false;
        }
        if self.tail == Some(handle.slot) {
            return true; // Already most recent
        }

        self.unlink(handle.slot);
        self.link_back(handle.slot);
        true
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<(&K, &V)> {
        self.resolve(handle).map(|node| (&node.key, &node.value))
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<(&K, &mut V)> {
        let slot = self.slots.get_mut(handle.slot)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_mut().map(|node| (&node.key, &mut node.value))
    }

    pub(crate) fn front(&self) -> Option<Handle> {
        self.head.map(|idx| self.handle_at(idx))
    }

    pub(crate) fn back(&self) -> Option<Handle> {
        self.tail.map(|idx| self.handle_at(idx))
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Drop every entry. Slots are kept for reuse with bumped generations,
    /// so outstanding handles stay dead.
    pub(crate) fn clear(&mut self) {
        self.free_list.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(idx);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walk the links in both directions and compare against `len`
    pub(crate) fn check_links(&self) -> Result<(), String> {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let node = self
                .slots
                .get(idx)
                .and_then(|slot| slot.node.as_ref())
                .ok_or_else(|| format!("slot {} is linked but vacant", idx))?;
            if node.prev != prev {
                return Err(format!(
                    "slot {} has prev {:?}, expected {:?}",
                    idx, node.prev, prev
                ));
            }
            count += 1;
            if count > self.len {
                return Err(format!("list is longer than len {}", self.len));
            }
            prev = Some(idx);
            cursor = node.next;
        }

        if prev != self.tail {
            return Err(format!("tail is {:?}, last node is {:?}", self.tail, prev));
        }
        if count != self.len {
            return Err(format!("walked {} nodes, len is {}", count, self.len));
        }

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if occupied + self.free_list.len() != self.slots.len() {
            return Err(format!(
                "{} occupied + {} free != {} slots",
                occupied,
                self.free_list.len(),
                self.slots.len()
            ));
        }
        Ok(())
    }

    fn resolve(&self, handle: Handle) -> Option<&Node<K, V>> {
        let slot = self.slots.get(handle.slot)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn handle_at(&self, idx: usize) -> Handle {
        Handle {
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.unlink(idx);
        let slot = &mut self.slots[idx];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(node) = &mut self.slots[idx].node {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.slots[tail_idx].node {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.slots[idx].node {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.slots[prev_idx].node {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.slots[next_idx].node {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }
}

/// Iterator over cache entries from least to most recently used
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let idx = self.next?;
        let node = list.slots.get(idx)?.node.as_ref()?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
