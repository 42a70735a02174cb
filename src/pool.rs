use crate::slot::Slot;
use crate::slot_list::SlotList;

/// Fixed array of slots allocated once at construction, with a free list of
/// the slots not currently holding an entry.
///
/// The pool never grows or shrinks. Running out of free slots is the normal
/// signal for the owning cache to evict something.
pub(crate) struct EntryPool<K, V> {
    slots: Box<[Slot<K, V>]>,
    free: SlotList,
}

impl<K, V> EntryPool<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut slots: Box<[Slot<K, V>]> = (0..capacity).map(|_| Slot::vacant()).collect();
        let mut free = SlotList::new();
        for idx in 0..capacity {
            free.push_back(&mut slots, idx);
        }
        Self { slots, free }
    }

    /// Takes a slot off the free list, or `None` if every slot is in use.
    pub(crate) fn acquire(&mut self) -> Option<usize> {
        self.free.pop_front(&mut self.slots)
    }

    /// Clears a slot and returns it to the front of the free list.
    ///
    /// The slot must already be unlinked from the recency list and the
    /// expiry heap. Returns the key and value it held.
    pub(crate) fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.slots[idx].clear();
        self.free.push_front(&mut self.slots, idx);
        entry
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }

    #[cfg(test)]
    pub(crate) fn free_indices(&self) -> Vec<usize> {
        self.free.indices(&self.slots)
    }
}
