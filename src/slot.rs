use crate::expiry::Expiry;

/// Marks a missing list link or a slot that is not in the expiry heap.
pub(crate) const NIL: usize = usize::MAX;

// A single pool entry. A slot is either free (no key, no value, linked in the
// free list, heap_index == NIL) or used (linked in the recency list, present
// in the expiry heap at heap_index, and referenced by the key index).
pub(crate) struct Slot<K, V> {
    pub(crate) key: Option<K>,
    pub(crate) value: Option<V>,
    pub(crate) expire: Expiry,
    pub(crate) prev: usize,
    pub(crate) next: usize,
    pub(crate) heap_index: usize,
}

impl<K, V> Slot<K, V> {
    pub(crate) fn vacant() -> Self {
        Self {
            key: None,
            value: None,
            expire: Expiry::Never,
            prev: NIL,
            next: NIL,
            heap_index: NIL,
        }
    }

    #[inline]
    pub(crate) fn is_used(&self) -> bool {
        self.key.is_some()
    }

    // Drop the payload and heap bookkeeping. Links are owned by whichever
    // list holds the slot and are left alone.
    pub(crate) fn clear(&mut self) -> Option<(K, V)> {
        self.expire = Expiry::Never;
        self.heap_index = NIL;
        match (self.key.take(), self.value.take()) {
            (Some(key), Some(value)) => Some((key, value)),
            _ => None,
        }
    }
}
