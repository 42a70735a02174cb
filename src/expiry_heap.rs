use crate::slot::{Slot, NIL};

/// Binary min-heap of slot indices keyed by each slot's expiry.
///
/// Every slot in the heap records its own position in `heap_index`, which is
/// kept up to date on every swap. That lets the cache remove an arbitrary
/// slot in O(log n) without searching for it.
///
/// Ties in expiry are broken by heap order; callers may only rely on
/// `peek_min` returning *some* entry with the smallest expiry.
pub(crate) struct ExpiryHeap {
    heap: Vec<usize>,
}

impl ExpiryHeap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// The slot with the soonest expiry.
    pub(crate) fn peek_min(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    pub(crate) fn push<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        let pos = self.heap.len();
        self.heap.push(idx);
        slots[idx].heap_index = pos;
        self.sift_up(slots, pos);
    }

    /// Removes `idx` from wherever it sits in the heap.
    pub(crate) fn remove<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        let pos = slots[idx].heap_index;
        debug_assert!(pos != NIL && self.heap[pos] == idx, "slot not in heap");

        let last = self.heap.len() - 1;
        if pos != last {
            self.swap(slots, pos, last);
        }
        self.heap.pop();
        slots[idx].heap_index = NIL;

        // The element moved into the hole may belong above or below it
        if pos < self.heap.len() && !self.sift_up(slots, pos) {
            self.sift_down(slots, pos);
        }
    }

    #[inline]
    fn less<K, V>(&self, slots: &[Slot<K, V>], a: usize, b: usize) -> bool {
        slots[self.heap[a]].expire < slots[self.heap[b]].expire
    }

    #[inline]
    fn swap<K, V>(&mut self, slots: &mut [Slot<K, V>], a: usize, b: usize) {
        self.heap.swap(a, b);
        slots[self.heap[a]].heap_index = a;
        slots[self.heap[b]].heap_index = b;
    }

    // Returns true if the element moved.
    fn sift_up<K, V>(&mut self, slots: &mut [Slot<K, V>], mut pos: usize) -> bool {
        let start = pos;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(slots, pos, parent) {
                break;
            }
            self.swap(slots, pos, parent);
            pos = parent;
        }
        pos != start
    }

    fn sift_down<K, V>(&mut self, slots: &mut [Slot<K, V>], mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(slots, right, left) {
                right
            } else {
                left
            };
            if !self.less(slots, child, pos) {
                break;
            }
            self.swap(slots, pos, child);
            pos = child;
        }
    }

    // Heap order holds and every slot's heap_index points back at itself.
    #[cfg(test)]
    pub(crate) fn is_consistent<K, V>(&self, slots: &[Slot<K, V>]) -> bool {
        self.heap.iter().enumerate().all(|(pos, &idx)| {
            let ordered = pos == 0 || !self.less(slots, pos, (pos - 1) / 2);
            ordered && slots[idx].heap_index == pos
        })
    }
}
