// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Free-list slot pool backing the mesh and the sweep's active regions.
//
// The tessellator allocates and frees vertices, faces, and regions in
// bursts; a slot pool keeps every live record in one contiguous vector so
// the rest of the crate can refer to them by small indices.

/// A vector of `T` slots with free-slot recycling. Freed slots keep their
/// storage and are reset to `T::default()` on reuse, so stale indices never
/// dangle; they just point at recycled records.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
    free: Vec<u32>,
}

impl<T: Default> Pool<T> {
    pub fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(n),
            free: Vec::new(),
        }
    }

    /// Hands out a slot index, recycling the most recently freed slot first.
    pub fn alloc(&mut self) -> u32 {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize] = T::default();
                idx
            }
            None => {
                self.slots.push(T::default());
                (self.slots.len() - 1) as u32
            }
        }
    }

    /// Returns a slot to the pool. The caller must not use `idx` afterwards.
    pub fn release(&mut self, idx: u32) {
        debug_assert!((idx as usize) < self.slots.len());
        self.free.push(idx);
    }

    /// Number of slots ever allocated, live or free.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<u32> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: u32) -> &T {
        &self.slots[idx as usize]
    }
}

impl<T> std::ops::IndexMut<u32> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        &mut self.slots[idx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_is_sequential_when_nothing_freed() {
        let mut pool: Pool<i32> = Pool::new();
        assert_eq!(pool.alloc(), 0);
        assert_eq!(pool.alloc(), 1);
        assert_eq!(pool.alloc(), 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn released_slot_is_recycled_and_reset() {
        let mut pool: Pool<i32> = Pool::new();
        let a = pool.alloc();
        pool[a] = 42;
        pool.release(a);
        let b = pool.alloc();
        assert_eq!(b, a);
        assert_eq!(pool[b], 0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn release_order_is_lifo() {
        let mut pool: Pool<u8> = Pool::new();
        let a = pool.alloc();
        let b = pool.alloc();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.alloc(), b);
        assert_eq!(pool.alloc(), a);
    }
}
