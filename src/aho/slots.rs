//! Slot allocation for the double array.
//!
//! Every slot carries a `used` bit and, while free, sits in a doubly-linked
//! list ordered by ascending index. Base probing walks that list instead of
//! the raw slot range, so densely packed arrays stay cheap to search.

use super::BLOCK_SIZE;

/// List terminator for `prev`/`next`/`head`/`tail`.
const NIL: u32 = u32::MAX;

/// Tracks which double-array slots are taken and hands out transition bases.
pub(crate) struct SlotAllocator {
    used: Vec<bool>,
    /// prev[i]/next[i] thread slot `i` into the free list while it is free.
    prev: Vec<u32>,
    next: Vec<u32>,
    head: u32,
    tail: u32,
}

impl SlotAllocator {
    /// Creates an allocator with no slots; callers extend before allocating.
    pub(crate) fn new() -> Self {
        Self {
            used: Vec::new(),
            prev: Vec::new(),
            next: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.used.len()
    }

    /// Appends one block of free slots, linked at the tail of the free list.
    pub(crate) fn extend_block(&mut self) {
        let old_cap = self.used.len();
        let new_cap = old_cap + BLOCK_SIZE;
        self.used.resize(new_cap, false);
        self.prev.resize(new_cap, NIL);
        self.next.resize(new_cap, NIL);
        for i in old_cap..new_cap {
            self.prev[i] = if i == old_cap { self.tail } else { (i - 1) as u32 };
            self.next[i] = if i + 1 == new_cap { NIL } else { (i + 1) as u32 };
        }
        if self.tail == NIL {
            self.head = old_cap as u32;
        } else {
            self.next[self.tail as usize] = old_cap as u32;
        }
        self.tail = (new_cap - 1) as u32;
    }

    /// Finds the smallest free base `b` such that `b + l` is free for every
    /// label `l` and a full 256-label block fits below capacity, then marks
    /// `b` and all `b + l` used.
    ///
    /// Grows by one block and rescans if the current slots are exhausted.
    ///
    /// # Panics
    ///
    /// Panics if the rescan after growth also fails; a fresh block always
    /// contains a viable base, so this indicates a bug in the allocator.
    pub(crate) fn find_free_base(&mut self, labels: &[u8]) -> usize {
        debug_assert!(!labels.is_empty());
        debug_assert!(labels.windows(2).all(|w| w[0] < w[1]));

        if let Some(base) = self.scan_from(0, labels) {
            self.claim(base, labels);
            return base;
        }
        let old_cap = self.used.len();
        self.extend_block();
        // Bases below this bound already failed on label collisions, not
        // capacity, and would fail again.
        let resume = old_cap.saturating_sub(BLOCK_SIZE - 1);
        if let Some(base) = self.scan_from(resume, labels) {
            self.claim(base, labels);
            return base;
        }
        panic!("no free base found after extending the slot array");
    }

    /// Walks the free list for the first viable base at or above `min_base`.
    fn scan_from(&self, min_base: usize, labels: &[u8]) -> Option<usize> {
        let cap = self.used.len();
        let mut cursor = self.head;
        while cursor != NIL {
            let base = cursor as usize;
            if base >= min_base {
                if base + (BLOCK_SIZE - 1) >= cap {
                    // The walk is ascending; nothing further fits either.
                    return None;
                }
                if labels.iter().all(|&l| !self.used[base + l as usize]) {
                    return Some(base);
                }
            }
            cursor = self.next[cursor as usize];
        }
        None
    }

    fn claim(&mut self, base: usize, labels: &[u8]) {
        self.mark_used(base);
        for &l in labels {
            let slot = base + l as usize;
            // Label 0 lands on the base slot, which is already claimed.
            if !self.used[slot] {
                self.mark_used(slot);
            }
        }
    }

    fn mark_used(&mut self, slot: usize) {
        debug_assert!(!self.used[slot]);
        self.used[slot] = true;
        let p = self.prev[slot];
        let n = self.next[slot];
        if p == NIL {
            self.head = n;
        } else {
            self.next[p as usize] = n;
        }
        if n == NIL {
            self.tail = p;
        } else {
            self.prev[n as usize] = p;
        }
        self.prev[slot] = NIL;
        self.next[slot] = NIL;
    }

    #[cfg(test)]
    fn is_used(&self, slot: usize) -> bool {
        self.used[slot]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fresh() -> SlotAllocator {
        let mut slots = SlotAllocator::new();
        slots.extend_block();
        slots
    }

    #[test]
    fn first_fit_starts_at_zero() {
        let mut slots = fresh();
        assert_eq!(slots.find_free_base(&[0]), 0);
        assert!(slots.is_used(0));
    }

    #[test]
    fn base_and_labels_are_claimed() {
        let mut slots = fresh();
        let base = slots.find_free_base(&[1, 3, 7]);
        assert_eq!(base, 0);
        for slot in [0, 1, 3, 7] {
            assert!(slots.is_used(slot));
        }
        assert!(!slots.is_used(2));
        assert!(!slots.is_used(4));
    }

    #[test]
    fn used_slots_are_skipped() {
        let mut slots = fresh();
        assert_eq!(slots.find_free_base(&[1]), 0); // takes 0 and 1
        // Base 2 is free and 2+1 is free.
        assert_eq!(slots.find_free_base(&[1]), 2);
        // A label colliding with slot 5 pushes the base past it.
        assert_eq!(slots.find_free_base(&[1]), 4); // takes 4 and 5
        assert_eq!(slots.find_free_base(&[1, 2]), 6);
    }

    #[test]
    fn collision_with_claimed_label_slot_rejects_candidate() {
        let mut slots = fresh();
        let first = slots.find_free_base(&[2]); // takes 0 and 2
        assert_eq!(first, 0);
        // Candidate 1 would place label 1 on the used slot 2.
        assert_eq!(slots.find_free_base(&[1]), 3);
    }

    #[test]
    fn exhaustion_grows_by_one_block() {
        let mut slots = fresh();
        assert_eq!(slots.capacity(), BLOCK_SIZE);
        // Claim every slot in the first block one by one.
        for i in 0..BLOCK_SIZE {
            assert_eq!(slots.find_free_base(&[0]), i);
        }
        let base = slots.find_free_base(&[0]);
        assert_eq!(base, BLOCK_SIZE);
        assert_eq!(slots.capacity(), 2 * BLOCK_SIZE);
    }

    #[test]
    fn large_label_forces_growth_headroom() {
        let mut slots = fresh();
        // Any base in the first block would put base+255 at or past the old
        // capacity edge except base 0.
        assert_eq!(slots.find_free_base(&[255]), 0);
        let base = slots.find_free_base(&[255]);
        assert!(base >= 1);
        assert!(base + 255 < slots.capacity());
        assert!(slots.is_used(base));
        assert!(slots.is_used(base + 255));
    }

    #[test]
    fn freshly_grown_block_is_linked_in_order() {
        let mut slots = fresh();
        for _ in 0..BLOCK_SIZE {
            slots.find_free_base(&[0]);
        }
        // The next three allocations walk the new block in ascending order.
        let a = slots.find_free_base(&[0]);
        let b = slots.find_free_base(&[0]);
        let c = slots.find_free_base(&[0]);
        assert_eq!((a, b, c), (BLOCK_SIZE, BLOCK_SIZE + 1, BLOCK_SIZE + 2));
    }
}
