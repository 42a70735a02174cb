use crate::slot::{Slot, NIL};

// Intrusive doubly linked list over slot indices. The links live in the slots
// themselves, so a slot can be unlinked from any position in O(1). A slot is
// linked into at most one list at a time.
pub(crate) struct SlotList {
    head: usize,
    tail: usize,
    len: usize,
}

impl SlotList {
    pub(crate) fn new() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // Insert slot at the front of the list
    pub(crate) fn push_front<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        slots[idx].prev = NIL;
        slots[idx].next = self.head;

        if self.head != NIL {
            slots[self.head].prev = idx;
        } else {
            // Empty list case
            self.tail = idx;
        }
        self.head = idx;
        self.len += 1;
    }

    // Insert slot at the back of the list
    pub(crate) fn push_back<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        slots[idx].next = NIL;
        slots[idx].prev = self.tail;

        if self.tail != NIL {
            slots[self.tail].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
        self.len += 1;
    }

    // Unlink slot from wherever it sits in the list
    pub(crate) fn remove<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        let prev = slots[idx].prev;
        let next = slots[idx].next;

        if prev != NIL {
            slots[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            slots[next].prev = prev;
        } else {
            self.tail = prev;
        }

        slots[idx].prev = NIL;
        slots[idx].next = NIL;
        self.len -= 1;
    }

    pub(crate) fn pop_front<K, V>(&mut self, slots: &mut [Slot<K, V>]) -> Option<usize> {
        let idx = self.front()?;
        self.remove(slots, idx);
        Some(idx)
    }

    // Move slot to the front, marking it most recently used
    pub(crate) fn touch<K, V>(&mut self, slots: &mut [Slot<K, V>], idx: usize) {
        if self.head == idx {
            return;
        }
        self.remove(slots, idx);
        self.push_front(slots, idx);
    }

    pub(crate) fn front(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    pub(crate) fn back(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Slot indices from front to back.
    #[cfg(test)]
    pub(crate) fn indices<K, V>(&self, slots: &[Slot<K, V>]) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.head;
        while current != NIL {
            out.push(current);
            current = slots[current].next;
        }
        out
    }
}
