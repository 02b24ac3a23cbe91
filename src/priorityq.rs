// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Two-phase priority queue over sweep event vertices.
//
// The sweep knows almost all of its events up front: the input vertices.
// Those are batch-inserted, sorted once at `init`, and consumed from a
// plain array. Vertices discovered later (edge intersections) go to a
// binary heap with deletable handles. Extraction compares the heads of
// both structures.
//
// The ordering is not intrinsic to the keys (it depends on projected
// coordinates stored in the mesh), so every operation takes the `leq`
// predicate as an argument.

use crate::mesh::VertId;

/// Ticket for a queued event. Negative values index the pre-sorted array
/// as `-(i + 1)`; positive values are heap handles; zero is unused.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PqHandle(pub(crate) i32);

impl PqHandle {
    pub const NONE: PqHandle = PqHandle(0);
}

struct HandleElem {
    key: VertId,
    /// Heap node currently holding this handle, or the next free handle
    /// when the slot is on the free list.
    node: u32,
}

/// Min-heap with stable handles. Node 1 is the root; `nodes` maps heap
/// position to handle slot and `handles` maps back.
struct Heap {
    nodes: Vec<u32>,
    handles: Vec<HandleElem>,
    size: usize,
    free_list: u32,
    initialized: bool,
}

impl Heap {
    fn new(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(0);
        nodes.push(1);
        let mut handles = Vec::with_capacity(capacity + 2);
        handles.push(HandleElem {
            key: VertId::NONE,
            node: 0,
        });
        handles.push(HandleElem {
            key: VertId::NONE,
            node: 1,
        });
        Heap {
            nodes,
            handles,
            size: 0,
            free_list: 0,
            initialized: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    fn key_at_node(&self, node: usize) -> VertId {
        self.handles[self.nodes[node] as usize].key
    }

    fn float_down(&mut self, mut curr: usize, leq: &impl Fn(VertId, VertId) -> bool) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child < self.size && leq(self.key_at_node(child + 1), self.key_at_node(child)) {
                child += 1;
            }
            if child > self.size {
                break;
            }
            let h_child = self.nodes[child];
            if leq(
                self.handles[h_curr as usize].key,
                self.handles[h_child as usize].key,
            ) {
                break;
            }
            self.nodes[curr] = h_child;
            self.handles[h_child as usize].node = curr as u32;
            curr = child;
        }
        self.nodes[curr] = h_curr;
        self.handles[h_curr as usize].node = curr as u32;
    }

    fn float_up(&mut self, mut curr: usize, leq: &impl Fn(VertId, VertId) -> bool) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 {
                break;
            }
            let h_parent = self.nodes[parent];
            if leq(
                self.handles[h_parent as usize].key,
                self.handles[h_curr as usize].key,
            ) {
                break;
            }
            self.nodes[curr] = h_parent;
            self.handles[h_parent as usize].node = curr as u32;
            curr = parent;
        }
        self.nodes[curr] = h_curr;
        self.handles[h_curr as usize].node = curr as u32;
    }

    fn init(&mut self, leq: &impl Fn(VertId, VertId) -> bool) {
        for i in (1..=self.size).rev() {
            self.float_down(i, leq);
        }
        self.initialized = true;
    }

    fn insert(&mut self, key: VertId, leq: &impl Fn(VertId, VertId) -> bool) -> PqHandle {
        self.size += 1;
        let curr = self.size;
        if curr >= self.nodes.len() {
            self.nodes.push(0);
        }

        let free = if self.free_list == 0 {
            self.handles.push(HandleElem { key, node: 0 });
            (self.handles.len() - 1) as u32
        } else {
            let free = self.free_list;
            self.free_list = self.handles[free as usize].node;
            self.handles[free as usize].key = key;
            free
        };

        self.nodes[curr] = free;
        self.handles[free as usize].node = curr as u32;

        if self.initialized {
            self.float_up(curr, leq);
        }
        PqHandle(free as i32)
    }

    fn minimum(&self) -> VertId {
        self.handles[self.nodes[1] as usize].key
    }

    fn extract_min(&mut self, leq: &impl Fn(VertId, VertId) -> bool) -> VertId {
        let h_min = self.nodes[1];
        let min = self.handles[h_min as usize].key;

        if self.size > 0 {
            self.nodes[1] = self.nodes[self.size];
            let moved = self.nodes[1];
            self.handles[moved as usize].node = 1;

            self.handles[h_min as usize].key = VertId::NONE;
            self.handles[h_min as usize].node = self.free_list;
            self.free_list = h_min;

            self.size -= 1;
            if self.size > 0 {
                self.float_down(1, leq);
            }
        }
        min
    }

    fn remove(&mut self, handle: PqHandle, leq: &impl Fn(VertId, VertId) -> bool) {
        let h = handle.0 as usize;
        debug_assert!(h >= 1 && h < self.handles.len());
        debug_assert!(self.handles[h].key != VertId::NONE);

        let curr = self.handles[h].node as usize;
        self.nodes[curr] = self.nodes[self.size];
        let moved = self.nodes[curr];
        self.handles[moved as usize].node = curr as u32;

        self.size -= 1;
        if curr <= self.size {
            if curr <= 1
                || leq(
                    self.key_at_node(curr >> 1),
                    self.handles[self.nodes[curr] as usize].key,
                )
            {
                self.float_down(curr, leq);
            } else {
                self.float_up(curr, leq);
            }
        }

        self.handles[h].key = VertId::NONE;
        self.handles[h].node = self.free_list;
        self.free_list = h as u32;
    }
}

/// The combined queue: batch array before `init`, heap spill after.
pub struct PriorityQ {
    heap: Heap,
    keys: Vec<VertId>,
    /// Permutation of `keys`, sorted worst-first so the minimum sits at
    /// the tail.
    order: Vec<u32>,
    /// Number of unconsumed `order` entries.
    size: usize,
    initialized: bool,
}

impl PriorityQ {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQ {
            heap: Heap::new(capacity),
            keys: Vec::with_capacity(capacity),
            order: Vec::new(),
            size: 0,
            initialized: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.heap.is_empty()
    }

    /// Queue an event. Before `init` this is a cheap append; afterwards it
    /// goes to the heap.
    pub fn insert(&mut self, key: VertId, leq: &impl Fn(VertId, VertId) -> bool) -> PqHandle {
        if self.initialized {
            return self.heap.insert(key, leq);
        }
        self.keys.push(key);
        PqHandle(-(self.keys.len() as i32))
    }

    /// Sort the batch and heapify the spill. Must be called exactly once,
    /// after the bulk inserts and before any extraction or removal.
    pub fn init(&mut self, leq: &impl Fn(VertId, VertId) -> bool) {
        debug_assert!(!self.initialized);
        self.size = self.keys.len();
        self.order = (0..self.size as u32).collect();
        let keys = &self.keys;
        self.order.sort_unstable_by(|&a, &b| {
            let ka = keys[a as usize];
            let kb = keys[b as usize];
            // Descending, so extraction pops from the tail.
            if leq(kb, ka) {
                if leq(ka, kb) {
                    std::cmp::Ordering::Equal
                } else {
                    std::cmp::Ordering::Less
                }
            } else {
                std::cmp::Ordering::Greater
            }
        });
        self.initialized = true;
        self.heap.init(leq);
    }

    fn sorted_tail(&self) -> VertId {
        self.keys[self.order[self.size - 1] as usize]
    }

    pub fn minimum(&self, leq: &impl Fn(VertId, VertId) -> bool) -> VertId {
        debug_assert!(self.initialized);
        if self.size == 0 {
            return self.heap.minimum();
        }
        let sort_min = self.sorted_tail();
        if !self.heap.is_empty() {
            let heap_min = self.heap.minimum();
            if leq(heap_min, sort_min) {
                return heap_min;
            }
        }
        sort_min
    }

    /// Pop the least event, or `VertId::NONE` when the queue is exhausted.
    pub fn extract_min(&mut self, leq: &impl Fn(VertId, VertId) -> bool) -> VertId {
        debug_assert!(self.initialized);
        if self.size == 0 {
            return self.heap.extract_min(leq);
        }

        let sort_min = self.sorted_tail();
        if !self.heap.is_empty() {
            let heap_min = self.heap.minimum();
            if leq(heap_min, sort_min) {
                return self.heap.extract_min(leq);
            }
        }
        // Consume the tail entry plus any already-removed slots under it.
        loop {
            self.size -= 1;
            if self.size == 0 || self.sorted_tail() != VertId::NONE {
                break;
            }
        }
        sort_min
    }

    /// Drop a queued event by its handle. Sorted-array slots are blanked
    /// and trimmed lazily by `extract_min`.
    pub fn remove(&mut self, handle: PqHandle, leq: &impl Fn(VertId, VertId) -> bool) {
        debug_assert!(self.initialized);
        debug_assert!(handle != PqHandle::NONE);
        if handle.0 > 0 {
            self.heap.remove(handle, leq);
            return;
        }
        let curr = (-handle.0 - 1) as usize;
        debug_assert!(self.keys[curr] != VertId::NONE);
        self.keys[curr] = VertId::NONE;
        while self.size > 0 && self.sorted_tail() == VertId::NONE {
            self.size -= 1;
        }
    }
}

impl Default for PriorityQ {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leq(a: VertId, b: VertId) -> bool {
        a.0 <= b.0
    }

    #[test]
    fn batch_inserts_come_out_sorted() {
        let mut pq = PriorityQ::new();
        for k in [5u32, 1, 9, 3, 7, 2, 8, 4, 6, 0] {
            pq.insert(VertId(k), &leq);
        }
        pq.init(&leq);
        for expected in 0..10 {
            assert_eq!(pq.extract_min(&leq), VertId(expected));
        }
        assert!(pq.is_empty());
    }

    #[test]
    fn late_inserts_interleave_with_batch() {
        let mut pq = PriorityQ::new();
        for k in [10u32, 30, 50] {
            pq.insert(VertId(k), &leq);
        }
        pq.init(&leq);
        pq.insert(VertId(20), &leq);
        pq.insert(VertId(40), &leq);
        pq.insert(VertId(5), &leq);

        let mut out = Vec::new();
        while !pq.is_empty() {
            out.push(pq.extract_min(&leq).0);
        }
        assert_eq!(out, vec![5, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn remove_batch_handle() {
        let mut pq = PriorityQ::new();
        let handles: Vec<PqHandle> = [4u32, 2, 6, 1, 3]
            .iter()
            .map(|&k| pq.insert(VertId(k), &leq))
            .collect();
        pq.init(&leq);
        // Drop the minimum (key 1) and a middle key (key 6).
        pq.remove(handles[3], &leq);
        pq.remove(handles[2], &leq);

        let mut out = Vec::new();
        while !pq.is_empty() {
            out.push(pq.extract_min(&leq).0);
        }
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn remove_heap_handle() {
        let mut pq = PriorityQ::new();
        pq.insert(VertId(10), &leq);
        pq.init(&leq);
        let h = pq.insert(VertId(1), &leq);
        pq.insert(VertId(5), &leq);
        pq.remove(h, &leq);

        assert_eq!(pq.extract_min(&leq), VertId(5));
        assert_eq!(pq.extract_min(&leq), VertId(10));
        assert!(pq.is_empty());
    }

    #[test]
    fn minimum_peeks_without_popping() {
        let mut pq = PriorityQ::new();
        pq.insert(VertId(3), &leq);
        pq.insert(VertId(1), &leq);
        pq.init(&leq);
        assert_eq!(pq.minimum(&leq), VertId(1));
        assert_eq!(pq.minimum(&leq), VertId(1));
        assert_eq!(pq.extract_min(&leq), VertId(1));
        assert_eq!(pq.minimum(&leq), VertId(3));
    }

    #[test]
    fn duplicate_keys_all_come_out() {
        let mut pq = PriorityQ::new();
        for _ in 0..4 {
            pq.insert(VertId(7), &leq);
        }
        pq.insert(VertId(3), &leq);
        pq.init(&leq);
        let mut out = Vec::new();
        while !pq.is_empty() {
            out.push(pq.extract_min(&leq).0);
        }
        assert_eq!(out, vec![3, 7, 7, 7, 7]);
    }
}
