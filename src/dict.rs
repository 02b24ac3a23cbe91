// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Ordered dictionary over the sweep's active regions.
//
// A sorted doubly-linked list with a circular head sentinel at node 0.
// The sweep inserts new regions next to a known neighbor, so the linear
// walk in `insert_before` is almost always one or two steps. The ordering
// depends on the current sweep event, so `leq` is passed per call rather
// than stored.

use crate::sweep::RegionId;

/// Index into the dictionary's node store.
pub type NodeIdx = u32;

/// The head sentinel. Also doubles as the "not found" result of `search`.
pub const DICT_HEAD: NodeIdx = 0;

#[derive(Clone, Debug)]
struct DictNode {
    key: RegionId,
    next: NodeIdx,
    prev: NodeIdx,
}

pub struct Dict {
    nodes: Vec<DictNode>,
    free: Vec<NodeIdx>,
}

impl Dict {
    pub fn new() -> Self {
        Dict {
            nodes: vec![DictNode {
                key: RegionId::NONE,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            }],
            free: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].next = DICT_HEAD;
        self.nodes[0].prev = DICT_HEAD;
        self.free.clear();
    }

    fn new_node(&mut self, key: RegionId, prev: NodeIdx, next: NodeIdx) -> NodeIdx {
        let node = DictNode { key, next, prev };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as NodeIdx
            }
        }
    }

    /// Insert `key` at its sorted position at the upper end of the list.
    pub fn insert(&mut self, key: RegionId, leq: &impl Fn(RegionId, RegionId) -> bool) -> NodeIdx {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Insert `key` below `node`, walking down until the predecessor
    /// orders at or below the new key. The sentinel stops the walk.
    pub fn insert_before(
        &mut self,
        mut node: NodeIdx,
        key: RegionId,
        leq: &impl Fn(RegionId, RegionId) -> bool,
    ) -> NodeIdx {
        loop {
            node = self.nodes[node as usize].prev;
            let node_key = self.nodes[node as usize].key;
            if node_key == RegionId::NONE || leq(node_key, key) {
                break;
            }
        }

        let next = self.nodes[node as usize].next;
        let new_idx = self.new_node(key, node, next);
        self.nodes[node as usize].next = new_idx;
        self.nodes[next as usize].prev = new_idx;
        new_idx
    }

    /// First node whose key orders at or above `key`; `DICT_HEAD` when
    /// every key is below it.
    pub fn search(&self, key: RegionId, leq: &impl Fn(RegionId, RegionId) -> bool) -> NodeIdx {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node as usize].next;
            let node_key = self.nodes[node as usize].key;
            if node_key == RegionId::NONE || leq(key, node_key) {
                return node;
            }
        }
    }

    pub fn remove(&mut self, node: NodeIdx) {
        debug_assert_ne!(node, DICT_HEAD);
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize].key = RegionId::NONE;
        self.free.push(node);
    }

    #[inline]
    pub fn key(&self, node: NodeIdx) -> RegionId {
        self.nodes[node as usize].key
    }

    #[inline]
    pub fn min(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].next
    }

    #[inline]
    pub fn max(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].prev
    }

    #[inline]
    pub fn succ(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn pred(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}
