//! Oldest-first queues used by the slot adapter.
//!
//! [`RecycledSet`] holds slots the layout engine discarded but that are still
//! parented under their old holder. [`BackfillQueue`] holds positions that
//! could not get any slot and wait for the embedding application to supply a
//! new child view. Both are insertion ordered so the oldest entry is picked
//! first.

use crate::collections::map::OrderedMap;
use crate::pool::{shift, HolderId, SlotId};

#[derive(Debug, Default)]
pub struct RecycledSet {
    entries: OrderedMap<SlotId, HolderId>,
}

impl RecycledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `slot` reclaimable; re-marking moves it to the back.
    pub fn mark(&mut self, slot: SlotId, holder: HolderId) {
        self.entries.shift_remove(&slot);
        self.entries.insert(slot, holder);
    }

    /// Cancels a pending reclaim. Returns whether the slot was marked.
    pub fn cancel(&mut self, slot: SlotId) -> bool {
        self.entries.shift_remove(&slot).is_some()
    }

    pub fn take_oldest(&mut self) -> Option<(SlotId, HolderId)> {
        self.entries.shift_remove_index(0)
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.entries.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.entries.keys().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Positions waiting for a newly supplied child view.
///
/// Keyed by position, so a position has at most one pending request. A
/// holder waits for at most one position: enqueueing it again drops its
/// previous request.
#[derive(Debug, Default)]
pub struct BackfillQueue {
    entries: OrderedMap<usize, HolderId>,
}

impl BackfillQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `position` for `holder`. Returns `false` if the position was
    /// already waiting, in which case its place in line is kept.
    pub fn enqueue(&mut self, position: usize, holder: HolderId) -> bool {
        self.discard_holder_except(holder, Some(position));
        self.entries.insert(position, holder).is_none()
    }

    pub fn oldest(&self) -> Option<(usize, HolderId)> {
        self.entries
            .get_index(0)
            .map(|(position, holder)| (*position, *holder))
    }

    pub fn remove(&mut self, position: usize) -> Option<HolderId> {
        self.entries.shift_remove(&position)
    }

    /// Drops any request made by `holder`. Returns the discarded position.
    pub fn discard_holder(&mut self, holder: HolderId) -> Option<usize> {
        self.discard_holder_except(holder, None)
    }

    fn discard_holder_except(&mut self, holder: HolderId, keep: Option<usize>) -> Option<usize> {
        let index = self
            .entries
            .iter()
            .position(|(position, candidate)| *candidate == holder && Some(*position) != keep)?;
        self.entries
            .shift_remove_index(index)
            .map(|(position, _)| position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.entries.contains_key(&position)
    }

    pub fn holder_for(&self, position: usize) -> Option<HolderId> {
        self.entries.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }

    /// Follows an item range change: removed positions are dropped, later
    /// positions move by `delta`. Queue order is preserved.
    pub fn shift_positions(&mut self, from: usize, delta: isize, removed_end: Option<usize>) {
        let previous = std::mem::take(&mut self.entries);
        for (position, holder) in previous {
            if let Some(end) = removed_end {
                if position >= from && position < end {
                    log::debug!("backfill for position {position} dropped; item removed");
                    continue;
                }
                self.entries.insert(shift(position, end, delta), holder);
            } else {
                self.entries.insert(shift(position, from, delta), holder);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_set_is_oldest_first() {
        let mut set = RecycledSet::new();
        set.mark(SlotId(2), HolderId(0));
        set.mark(SlotId(0), HolderId(1));
        set.mark(SlotId(1), HolderId(2));

        assert_eq!(set.take_oldest(), Some((SlotId(2), HolderId(0))));
        assert_eq!(set.take_oldest(), Some((SlotId(0), HolderId(1))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remarking_moves_slot_to_back() {
        let mut set = RecycledSet::new();
        set.mark(SlotId(0), HolderId(0));
        set.mark(SlotId(1), HolderId(1));
        set.mark(SlotId(0), HolderId(0));

        assert_eq!(set.slots().collect::<Vec<_>>(), vec![SlotId(1), SlotId(0)]);
    }

    #[test]
    fn cancel_removes_pending_reclaim() {
        let mut set = RecycledSet::new();
        set.mark(SlotId(3), HolderId(0));
        assert!(set.cancel(SlotId(3)));
        assert!(!set.cancel(SlotId(3)));
        assert_eq!(set.take_oldest(), None);
    }

    #[test]
    fn backfill_keeps_one_request_per_position() {
        let mut queue = BackfillQueue::new();
        assert!(queue.enqueue(4, HolderId(0)));
        assert!(queue.enqueue(5, HolderId(1)));
        assert!(!queue.enqueue(4, HolderId(2)));

        assert_eq!(queue.oldest(), Some((4, HolderId(2))));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn backfill_keeps_one_request_per_holder() {
        let mut queue = BackfillQueue::new();
        queue.enqueue(4, HolderId(0));
        queue.enqueue(5, HolderId(1));
        queue.enqueue(6, HolderId(0));

        assert_eq!(queue.positions(), vec![5, 6]);
        assert_eq!(queue.discard_holder(HolderId(1)), Some(5));
        assert_eq!(queue.discard_holder(HolderId(1)), None);
    }

    #[test]
    fn backfill_follows_range_changes() {
        let mut queue = BackfillQueue::new();
        queue.enqueue(2, HolderId(0));
        queue.enqueue(5, HolderId(1));
        queue.enqueue(8, HolderId(2));

        queue.shift_positions(4, 3, None);
        assert_eq!(queue.positions(), vec![2, 8, 11]);

        // Remove [7, 9): position 8 disappears, 11 moves down by two.
        queue.shift_positions(7, -2, Some(9));
        assert_eq!(queue.positions(), vec![2, 9]);
        assert_eq!(queue.holder_for(9), Some(HolderId(2)));
    }
}
