//! Slot pool and position binding bookkeeping.
//!
//! Nothing in this module makes decisions; [`SlotAdapter`](crate::SlotAdapter)
//! owns the policy and uses these structures to record its outcome.

use std::fmt;

use crate::collections::map::HashMap;
use crate::view_tree::ViewId;

/// Index of a reusable child view in the [`SlotPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

impl SlotId {
    #[inline]
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Identifier of a layout engine container ("view holder").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HolderId(pub usize);

impl HolderId {
    #[inline]
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "holder#{}", self.0)
    }
}

/// Lifecycle of a single slot.
///
/// `Free` slots have never been handed to a holder. A `Bound` slot is shown
/// by its holder; a `Recycled` slot is still parented under its holder but
/// may be reclaimed by another one until the engine reattaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Free,
    Bound(HolderId),
    Recycled(HolderId),
}

impl SlotState {
    pub fn holder(self) -> Option<HolderId> {
        match self {
            SlotState::Free => None,
            SlotState::Bound(holder) | SlotState::Recycled(holder) => Some(holder),
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, SlotState::Free)
    }

    pub fn is_bound(self) -> bool {
        matches!(self, SlotState::Bound(_))
    }

    pub fn is_recycled(self) -> bool {
        matches!(self, SlotState::Recycled(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct SlotEntry {
    view: ViewId,
    state: SlotState,
}

/// The instantiated child views, in the order the embedding application
/// supplied them, plus the count of slots handed out so far.
#[derive(Debug, Default)]
pub struct SlotPool {
    slots: Vec<SlotEntry>,
    consumed: usize,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots handed out by fresh allocation.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn fresh_available(&self) -> bool {
        self.consumed < self.slots.len()
    }

    pub fn push_view(&mut self, view: ViewId) -> SlotId {
        self.slots.push(SlotEntry {
            view,
            state: SlotState::Free,
        });
        SlotId(self.slots.len() - 1)
    }

    /// Inserts a view at `index` (clamped to the end), shifting later slots.
    pub fn insert_view(&mut self, index: usize, view: ViewId) -> SlotId {
        let at = index.min(self.slots.len());
        self.slots.insert(
            at,
            SlotEntry {
                view,
                state: SlotState::Free,
            },
        );
        if at < self.consumed {
            self.consumed += 1;
        }
        SlotId(at)
    }

    /// Removes the slot at `slot`, shifting later slots down by one.
    pub fn remove_view(&mut self, slot: SlotId) -> Option<(ViewId, SlotState)> {
        if slot.0 >= self.slots.len() {
            return None;
        }
        let entry = self.slots.remove(slot.0);
        if slot.0 < self.consumed {
            self.consumed -= 1;
        }
        Some((entry.view, entry.state))
    }

    /// Hands out the next never-used slot.
    pub fn claim_fresh(&mut self) -> Option<SlotId> {
        if !self.fresh_available() {
            return None;
        }
        let slot = SlotId(self.consumed);
        self.consumed += 1;
        Some(slot)
    }

    /// Marks every slot up to and including `slot` as handed out.
    pub fn mark_consumed(&mut self, slot: SlotId) {
        self.consumed = self.consumed.max(slot.0 + 1).min(self.slots.len());
    }

    pub fn view(&self, slot: SlotId) -> Option<ViewId> {
        self.slots.get(slot.0).map(|entry| entry.view)
    }

    pub fn state(&self, slot: SlotId) -> SlotState {
        self.slots
            .get(slot.0)
            .map(|entry| entry.state)
            .unwrap_or_default()
    }

    pub fn set_state(&mut self, slot: SlotId, state: SlotState) {
        if let Some(entry) = self.slots.get_mut(slot.0) {
            entry.state = state;
        }
    }

    pub fn slot_of_view(&self, view: ViewId) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|entry| entry.view == view)
            .map(SlotId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, ViewId, SlotState)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, entry)| (SlotId(index), entry.view, entry.state))
    }
}

/// Bidirectional `position <-> slot` mapping for every materialized position.
///
/// Both directions are kept in lockstep: binding a position evicts whatever
/// slot held it before, and binding a slot evicts its previous position.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    by_position: HashMap<usize, SlotId>,
    by_slot: HashMap<SlotId, usize>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, position: usize, slot: SlotId) {
        if let Some(previous_slot) = self.by_position.insert(position, slot) {
            if previous_slot != slot {
                self.by_slot.remove(&previous_slot);
            }
        }
        if let Some(previous_position) = self.by_slot.insert(slot, position) {
            if previous_position != position {
                self.by_position.remove(&previous_position);
            }
        }
    }

    pub fn unbind_slot(&mut self, slot: SlotId) -> Option<usize> {
        let position = self.by_slot.remove(&slot)?;
        self.by_position.remove(&position);
        Some(position)
    }

    pub fn unbind_position(&mut self, position: usize) -> Option<SlotId> {
        let slot = self.by_position.remove(&position)?;
        self.by_slot.remove(&slot);
        Some(slot)
    }

    pub fn slot_for(&self, position: usize) -> Option<SlotId> {
        self.by_position.get(&position).copied()
    }

    pub fn position_of(&self, slot: SlotId) -> Option<usize> {
        self.by_slot.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Entries sorted by position.
    pub fn entries(&self) -> Vec<(usize, SlotId)> {
        let mut entries: Vec<_> = self
            .by_position
            .iter()
            .map(|(position, slot)| (*position, *slot))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Moves every position at or after `from` by `delta`.
    ///
    /// Callers remove positions that would fall below `from` first.
    pub fn shift_positions(&mut self, from: usize, delta: isize) {
        self.remap(|position, slot| (shift(position, from, delta), slot));
    }

    /// Moves every slot index at or after `from` by `delta`.
    pub fn shift_slots(&mut self, from: usize, delta: isize) {
        self.remap(|position, slot| (position, SlotId(shift(slot.0, from, delta))));
    }

    fn remap(&mut self, f: impl Fn(usize, SlotId) -> (usize, SlotId)) {
        let entries = self.entries();
        self.by_position.clear();
        self.by_slot.clear();
        for (position, slot) in entries {
            let (position, slot) = f(position, slot);
            self.by_position.insert(position, slot);
            self.by_slot.insert(slot, position);
        }
    }
}

pub(crate) fn shift(value: usize, from: usize, delta: isize) -> usize {
    if value < from {
        value
    } else {
        value.saturating_add_signed(delta)
    }
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
mod tests;
