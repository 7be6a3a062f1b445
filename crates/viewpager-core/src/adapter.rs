//! The slot adapter: the state machine behind every layout engine callback.
//!
//! The layout engine creates holders (empty containers) and asks the adapter
//! to bind, recycle and reattach them. In [`SlotMode::Dynamic`] the adapter
//! maps positions onto a small pool of reusable child views, resolving each
//! bind in a fixed order:
//!
//! 1. fresh allocation of a child view that was never handed out,
//! 2. reclaim of the oldest recycled slot,
//! 3. a backfill request asking the embedding application for another view.
//!
//! In [`SlotMode::Static`] every position owns its child view and binding is
//! plain indexing.
//!
//! All calls are expected on one thread, in whatever order the engine
//! chooses; every operation tolerates redundant or stale notifications.

use std::rc::Rc;

use crate::base_layer::{BaseLayerCompositor, BaseLayerOutcome};
use crate::error::PagerError;
use crate::event::{EventSink, PagerEvent};
use crate::pool::{BindingTable, HolderId, SlotId, SlotPool, SlotState};
use crate::recycler::{BackfillQueue, RecycledSet};
use crate::sequence::{ItemSequence, RangeChange};
use crate::view_tree::{ViewId, ViewTree};

/// How positions map onto child views. Fixed for the adapter's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotMode {
    /// Each child view is one item; no pooling.
    Static,
    /// Child views are a bounded pool reused across positions.
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterConfig {
    pub mode: SlotMode,
    /// Child index 0 is the base layer instead of an item view.
    pub base_layer: bool,
}

impl AdapterConfig {
    pub fn dynamic() -> Self {
        Self {
            mode: SlotMode::Dynamic,
            base_layer: false,
        }
    }

    pub fn static_children() -> Self {
        Self {
            mode: SlotMode::Static,
            base_layer: false,
        }
    }

    pub fn with_base_layer(mut self, base_layer: bool) -> Self {
        self.base_layer = base_layer;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound { slot: SlotId },
    /// Queued for backfill; resolved when a new child view arrives.
    Pending,
    /// Unknown holder, or (static mode) no child view exists for the position.
    Unavailable,
}

impl BindOutcome {
    pub fn slot(self) -> Option<SlotId> {
        match self {
            BindOutcome::Bound { slot } => Some(slot),
            _ => None,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, BindOutcome::Pending)
    }
}

/// Counters describing the pool, for tests and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub slots: usize,
    pub consumed: usize,
    pub bound: usize,
    pub recycled: usize,
    pub pending: usize,
    pub holders: usize,
}

#[derive(Debug, Clone, Copy)]
struct HolderRecord {
    container: ViewId,
    slot: Option<SlotId>,
}

pub struct SlotAdapter {
    config: AdapterConfig,
    tree: ViewTree,
    items: ItemSequence,
    pool: SlotPool,
    bindings: BindingTable,
    recycled: RecycledSet,
    backfill: BackfillQueue,
    base_layer: BaseLayerCompositor,
    holders: Vec<HolderRecord>,
    sink: Rc<dyn EventSink>,
    has_bound: bool,
    last_selected: Option<usize>,
}

impl std::fmt::Debug for SlotAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotAdapter")
            .field("config", &self.config)
            .field("items", &self.items)
            .field("pool", &self.pool)
            .field("bindings", &self.bindings)
            .field("recycled", &self.recycled)
            .field("backfill", &self.backfill)
            .field("base_layer", &self.base_layer)
            .field("holders", &self.holders)
            .finish()
    }
}

impl SlotAdapter {
    pub fn new(config: AdapterConfig, sink: Rc<dyn EventSink>) -> Self {
        Self::with_tree(config, ViewTree::new(), sink)
    }

    pub fn with_tree(config: AdapterConfig, tree: ViewTree, sink: Rc<dyn EventSink>) -> Self {
        Self {
            config,
            tree,
            items: ItemSequence::default(),
            pool: SlotPool::new(),
            bindings: BindingTable::new(),
            recycled: RecycledSet::new(),
            backfill: BackfillQueue::new(),
            base_layer: BaseLayerCompositor::new(),
            holders: Vec::new(),
            sink,
            has_bound: false,
            last_selected: None,
        }
    }

    pub fn config(&self) -> AdapterConfig {
        self.config
    }

    pub fn mode(&self) -> SlotMode {
        self.config.mode
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// Mutable access for creating the child views that will be supplied
    /// through [`add_child_view`](Self::add_child_view).
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn recycled(&self) -> &RecycledSet {
        &self.recycled
    }

    pub fn backfill(&self) -> &BackfillQueue {
        &self.backfill
    }

    pub fn base_layer(&self) -> &BaseLayerCompositor {
        &self.base_layer
    }

    pub fn sink(&self) -> Rc<dyn EventSink> {
        Rc::clone(&self.sink)
    }

    pub fn stats(&self) -> AdapterStats {
        AdapterStats {
            slots: self.pool.len(),
            consumed: self.pool.consumed(),
            bound: self.pool.iter().filter(|(_, _, state)| state.is_bound()).count(),
            recycled: self.recycled.len(),
            pending: self.backfill.len(),
            holders: self.holders.len(),
        }
    }

    // ── Item sequence ────────────────────────────────────────────────────

    /// Number of positions the layout engine may ask for.
    pub fn item_count(&self) -> usize {
        match self.config.mode {
            SlotMode::Static => self.pool.len(),
            SlotMode::Dynamic => self.items.count(),
        }
    }

    pub fn set_item_count(&mut self, count: usize) -> Option<RangeChange> {
        if !self.accepts_item_counts() {
            return None;
        }
        let change = self.items.set_count(count)?;
        self.follow_range_change(change);
        Some(change)
    }

    pub fn insert_item_range(&mut self, start: usize, count: usize) -> Option<RangeChange> {
        if !self.accepts_item_counts() {
            return None;
        }
        let change = self.items.insert_range(start, count)?;
        self.follow_range_change(change);
        Some(change)
    }

    pub fn remove_item_range(&mut self, start: usize, count: usize) -> Option<RangeChange> {
        if !self.accepts_item_counts() {
            return None;
        }
        let change = self.items.remove_range(start, count)?;
        self.follow_range_change(change);
        Some(change)
    }

    fn accepts_item_counts(&self) -> bool {
        if self.config.mode == SlotMode::Static {
            log::warn!("item count is the child count in static mode; request ignored");
            return false;
        }
        true
    }

    /// Keeps every position-keyed structure aligned with an item range change.
    fn follow_range_change(&mut self, change: RangeChange) {
        match change {
            RangeChange::Inserted { start, count } => {
                let delta = count as isize;
                self.bindings.shift_positions(start, delta);
                self.backfill.shift_positions(start, delta, None);
                self.base_layer.shift_target(start, delta, None);
            }
            RangeChange::Removed { start, count } => {
                let end = start + count;
                let removed: Vec<usize> = self
                    .bindings
                    .entries()
                    .into_iter()
                    .map(|(position, _)| position)
                    .filter(|position| (start..end).contains(position))
                    .collect();
                for position in removed {
                    self.bindings.unbind_position(position);
                }
                let delta = -(count as isize);
                self.bindings.shift_positions(end, delta);
                self.backfill.shift_positions(start, delta, Some(end));
                self.base_layer.shift_target(start, delta, Some(end));
            }
        }
    }

    // ── Child views supplied by the embedding application ────────────────

    /// Number of child views, counting the base layer.
    pub fn child_count(&self) -> usize {
        let base = usize::from(self.config.base_layer && self.base_layer.view().is_some());
        self.pool.len() + base
    }

    pub fn child_at(&self, index: usize) -> Option<ViewId> {
        let index = match self.base_child_index(index) {
            Ok(index) => index,
            Err(()) => return self.base_layer.view(),
        };
        self.pool.view(SlotId(index))
    }

    /// Maps a child index to a slot index; `Err` means the base layer.
    fn base_child_index(&self, index: usize) -> Result<usize, ()> {
        if !self.config.base_layer {
            return Ok(index);
        }
        index.checked_sub(1).ok_or(())
    }

    /// Supplies a child view. In static mode this inserts an item; in dynamic
    /// mode it grows the pool and resolves the oldest backfill request.
    pub fn add_child_view(
        &mut self,
        view: ViewId,
        index: usize,
    ) -> Result<Option<RangeChange>, PagerError> {
        if !self.tree.contains(view) {
            return Err(crate::view_tree::ViewError::Missing { id: view }.into());
        }
        if let Some(slot) = self.pool.slot_of_view(view) {
            log::warn!("view {view} already supplied as {slot}; ignored");
            return Err(PagerError::DuplicateChild { view });
        }
        let Ok(index) = self.base_child_index(index) else {
            self.install_base_layer(view);
            return Ok(None);
        };
        if self.base_layer.view() == Some(view) {
            log::warn!("view {view} is the base layer; not added as a page");
            return Err(PagerError::DuplicateChild { view });
        }
        match self.config.mode {
            SlotMode::Static => {
                let slot = self.pool.insert_view(index, view);
                self.shift_static_slots(slot.0, 1);
                Ok(Some(RangeChange::Inserted {
                    start: slot.0,
                    count: 1,
                }))
            }
            SlotMode::Dynamic => {
                let consumed = self.pool.consumed();
                let at = if index < consumed {
                    log::debug!("child view at {index} appended after {consumed} handed-out slots");
                    consumed
                } else {
                    index
                };
                let slot = self.pool.insert_view(at, view);
                log::debug!("pool grew to {} with {slot}", self.pool.len());
                self.resolve_backfill();
                Ok(None)
            }
        }
    }

    pub fn remove_child_view(&mut self, index: usize) -> Result<Option<RangeChange>, PagerError> {
        let Ok(slot_index) = self.base_child_index(index) else {
            if let Some(view) = self.base_layer.clear_view(&mut self.tree) {
                log::debug!("base layer {view} removed");
            }
            return Ok(None);
        };
        let len = self.pool.len();
        if slot_index >= len {
            return Err(PagerError::ChildIndexOutOfRange { index, len });
        }
        let slot = SlotId(slot_index);
        match self.config.mode {
            SlotMode::Static => {
                if let Some(holder) = self.pool.state(slot).holder() {
                    if let Some(record) = self.holders.get_mut(holder.0) {
                        record.slot = None;
                    }
                }
                self.bindings.unbind_slot(slot);
                if let Some((view, _)) = self.pool.remove_view(slot) {
                    self.tree.detach(view);
                }
                self.shift_static_slots(slot_index + 1, -1);
                self.base_layer
                    .shift_target(slot_index, -1, Some(slot_index + 1));
                Ok(Some(RangeChange::Removed {
                    start: slot_index,
                    count: 1,
                }))
            }
            SlotMode::Dynamic => {
                if slot_index < self.pool.consumed() {
                    return Err(PagerError::SlotInUse { slot });
                }
                self.pool.remove_view(slot);
                Ok(None)
            }
        }
    }

    fn install_base_layer(&mut self, view: ViewId) {
        if let Some(previous) = self.base_layer.set_view(&mut self.tree, view) {
            log::debug!("base layer {previous} replaced by {view}");
        }
        if let Some(target) = self.base_layer.deferred_target() {
            if let Some(container) = self.container_for_position(target) {
                self.complete_base_layer(target, container);
            }
        }
    }

    /// In static mode slot indexes are positions, so both move together.
    fn shift_static_slots(&mut self, from: usize, delta: isize) {
        self.bindings.shift_positions(from, delta);
        self.bindings.shift_slots(from, delta);
        for record in &mut self.holders {
            if let Some(slot) = record.slot {
                record.slot = Some(SlotId(crate::pool::shift(slot.0, from, delta)));
            }
        }
        if delta > 0 {
            self.base_layer.shift_target(from, delta, None);
        }
    }

    // ── Layout engine callbacks ──────────────────────────────────────────

    /// Creates an empty container the engine will bind positions into.
    pub fn create_holder(&mut self) -> HolderId {
        let container = self.tree.create_container();
        self.holders.push(HolderRecord {
            container,
            slot: None,
        });
        HolderId(self.holders.len() - 1)
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    pub fn holder_container(&self, holder: HolderId) -> Option<ViewId> {
        self.holders.get(holder.0).map(|record| record.container)
    }

    pub fn holder_slot(&self, holder: HolderId) -> Option<SlotId> {
        self.holders.get(holder.0).and_then(|record| record.slot)
    }

    pub fn holders(&self) -> impl Iterator<Item = (HolderId, ViewId, Option<SlotId>)> + '_ {
        self.holders
            .iter()
            .enumerate()
            .map(|(index, record)| (HolderId(index), record.container, record.slot))
    }

    /// Slot currently representing `position`, if any.
    pub fn slot_for(&self, position: usize) -> Option<SlotId> {
        self.bindings.slot_for(position)
    }

    /// Container currently showing `position`; recycled holders do not count.
    pub fn container_for_position(&self, position: usize) -> Option<ViewId> {
        let slot = self.bindings.slot_for(position)?;
        match self.pool.state(slot) {
            SlotState::Bound(holder) => self.holder_container(holder),
            _ => None,
        }
    }

    pub fn bind(&mut self, holder: HolderId, position: usize) -> BindOutcome {
        let Some(record) = self.holders.get(holder.0).copied() else {
            log::warn!("bind of unknown {holder} to position {position} ignored");
            return BindOutcome::Unavailable;
        };
        match self.config.mode {
            SlotMode::Static => self.bind_static(holder, record, position),
            SlotMode::Dynamic => self.bind_dynamic(holder, record, position),
        }
    }

    fn bind_dynamic(
        &mut self,
        holder: HolderId,
        record: HolderRecord,
        position: usize,
    ) -> BindOutcome {
        if let Some(slot) = record.slot {
            let hit = self.pool.state(slot) == SlotState::Bound(holder)
                && self.bindings.position_of(slot) == Some(position);
            if hit {
                log::trace!("{holder} already shows position {position}");
                self.complete_base_layer(position, record.container);
                return BindOutcome::Bound { slot };
            }
            // The engine reuses the holder as is; its slot goes with it.
            if self.recycled.cancel(slot) {
                log::trace!("rebind of {holder} cancels pending reclaim of {slot}");
            }
            self.assign(holder, slot, position);
            self.emit(PagerEvent::SlotBound {
                from: slot,
                to: position,
            });
            self.complete_base_layer(position, record.container);
            return BindOutcome::Bound { slot };
        }

        let slot = if let Some(slot) = self.pool.claim_fresh() {
            log::trace!("position {position} takes fresh {slot}");
            slot
        } else if let Some(slot) = self.reclaim_oldest() {
            log::trace!("position {position} reclaims {slot}");
            slot
        } else {
            self.request_new_child_view(holder, position);
            return BindOutcome::Pending;
        };

        self.attach_slot(slot, record.container);
        self.assign(holder, slot, position);
        self.emit(PagerEvent::SlotBound {
            from: slot,
            to: position,
        });
        self.complete_base_layer(position, record.container);
        BindOutcome::Bound { slot }
    }

    fn bind_static(&mut self, holder: HolderId, record: HolderRecord, position: usize) -> BindOutcome {
        self.has_bound = true;
        let slot = SlotId(position);
        let Some(view) = self.pool.view(slot) else {
            log::warn!(
                "no child view for position {position}; {} children",
                self.pool.len()
            );
            return BindOutcome::Unavailable;
        };
        if record.slot == Some(slot) && self.tree.parent(view) == Some(record.container) {
            self.complete_base_layer(position, record.container);
            return BindOutcome::Bound { slot };
        }

        if let Some(previous) = record.slot {
            if self.pool.state(previous).holder() == Some(holder) {
                self.pool.set_state(previous, SlotState::Free);
                self.bindings.unbind_slot(previous);
            }
        }
        let base_view = self.base_layer.view();
        let stale: Vec<ViewId> = self
            .tree
            .children(record.container)
            .iter()
            .copied()
            .filter(|child| Some(*child) != base_view)
            .collect();
        for child in stale {
            self.tree.detach(child);
        }

        // Only a holder being recycled at the same time can still parent it.
        if let Some(previous_parent) = self.tree.detach(view) {
            if let Some(other) = self.pool.state(slot).holder().filter(|other| *other != holder) {
                if let Some(other_record) = self.holders.get_mut(other.0) {
                    other_record.slot = None;
                }
            }
            log::debug!("position {position} view taken from container {previous_parent}");
        }
        self.attach_slot(slot, record.container);
        self.pool.mark_consumed(slot);
        self.assign(holder, slot, position);
        self.complete_base_layer(position, record.container);
        BindOutcome::Bound { slot }
    }

    /// Marks the holder's slot reclaimable. The binding stays until another
    /// holder actually reclaims the slot.
    pub fn recycle(&mut self, holder: HolderId) {
        if self.config.mode == SlotMode::Static {
            return;
        }
        let Some(record) = self.holders.get(holder.0).copied() else {
            log::warn!("recycle of unknown {holder} ignored");
            return;
        };
        let Some(slot) = record.slot else {
            if let Some(position) = self.backfill.discard_holder(holder) {
                log::debug!("{holder} recycled; backfill for position {position} dropped");
            }
            return;
        };
        match self.pool.state(slot) {
            SlotState::Bound(owner) if owner == holder => {
                self.pool.set_state(slot, SlotState::Recycled(holder));
                self.recycled.mark(slot, holder);
            }
            SlotState::Recycled(owner) if owner == holder => {
                log::debug!("redundant recycle of {holder}");
            }
            state => {
                log::warn!("recycle of {holder} ignored; {slot} is {state:?}");
            }
        }
    }

    /// The engine kept the holder after all; cancel its pending reclaim.
    pub fn reattach(&mut self, holder: HolderId) {
        if self.config.mode == SlotMode::Static {
            return;
        }
        let Some(slot) = self.holder_slot(holder) else {
            return;
        };
        if self.pool.state(slot) == SlotState::Recycled(holder) && self.recycled.cancel(slot) {
            self.pool.set_state(slot, SlotState::Bound(holder));
            log::trace!("{holder} reattached; {slot} kept");
        }
    }

    fn reclaim_oldest(&mut self) -> Option<SlotId> {
        while let Some((slot, previous_holder)) = self.recycled.take_oldest() {
            if self.pool.state(slot) != SlotState::Recycled(previous_holder) {
                log::debug!("stale recycled entry for {slot} skipped");
                continue;
            }
            if let Some(record) = self.holders.get_mut(previous_holder.0) {
                record.slot = None;
            }
            if let Some(view) = self.pool.view(slot) {
                self.tree.detach(view);
            }
            self.bindings.unbind_slot(slot);
            self.pool.set_state(slot, SlotState::Free);
            return Some(slot);
        }
        None
    }

    fn request_new_child_view(&mut self, holder: HolderId, position: usize) {
        if self.backfill.enqueue(position, holder) {
            log::debug!("position {position} waits for a new child view");
            self.emit(PagerEvent::NeedNewChildView);
        } else {
            log::debug!("position {position} already waits for a child view");
        }
    }

    /// Binds the oldest still-relevant backfill request, if a slot is now
    /// available. At most one request is resolved per call.
    fn resolve_backfill(&mut self) {
        while let Some((position, holder)) = self.backfill.oldest() {
            let Some(record) = self.backfill_target(position, holder) else {
                log::debug!("stale backfill for position {position} discarded");
                self.backfill.remove(position);
                continue;
            };
            if !self.pool.fresh_available() && self.recycled.is_empty() {
                return;
            }
            self.backfill.remove(position);
            if let BindOutcome::Bound { slot } = self.bind_dynamic(holder, record, position) {
                log::debug!("backfill resolved position {position} with {slot}");
            }
            return;
        }
    }

    fn backfill_target(&self, position: usize, holder: HolderId) -> Option<HolderRecord> {
        if !self.items.contains(position) {
            return None;
        }
        let shown = self
            .bindings
            .slot_for(position)
            .is_some_and(|slot| self.pool.state(slot).is_bound());
        if shown {
            return None;
        }
        self.holders
            .get(holder.0)
            .copied()
            .filter(|record| record.slot.is_none())
    }

    fn attach_slot(&mut self, slot: SlotId, container: ViewId) {
        let Some(view) = self.pool.view(slot) else {
            return;
        };
        if let Some(previous) = self.tree.detach(view) {
            log::debug!("{slot} view detached from {previous} before attach");
        }
        if let Err(err) = self.tree.attach(container, view, None) {
            log::warn!("attaching {slot} failed: {err}");
        }
    }

    fn assign(&mut self, holder: HolderId, slot: SlotId, position: usize) {
        self.pool.set_state(slot, SlotState::Bound(holder));
        self.bindings.bind(position, slot);
        if let Some(record) = self.holders.get_mut(holder.0) {
            record.slot = Some(slot);
        }
        self.backfill.discard_holder(holder);
        self.has_bound = true;
    }

    fn emit(&self, event: PagerEvent) {
        self.sink.emit(event);
    }

    // ── Base layer ───────────────────────────────────────────────────────

    /// Moves the base layer under the container showing `position`, or
    /// defers until that position is bound. `None` without a base layer.
    pub fn bind_base_layer(&mut self, position: usize) -> Option<BaseLayerOutcome> {
        if !self.config.base_layer {
            return None;
        }
        let container = self.container_for_position(position);
        match self.base_layer.bind(&mut self.tree, position, container) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                log::warn!("base layer bind to position {position} failed: {err}");
                None
            }
        }
    }

    fn complete_base_layer(&mut self, position: usize, container: ViewId) {
        if !self.config.base_layer {
            return;
        }
        match self
            .base_layer
            .complete_deferred(&mut self.tree, position, container)
        {
            Ok(Some(outcome)) => log::trace!("deferred base layer for {position}: {outcome:?}"),
            Ok(None) => {}
            Err(err) => log::warn!("deferred base layer for {position} failed: {err}"),
        }
    }

    // ── Selected item memo ───────────────────────────────────────────────

    /// Remembers `current` before a reconfiguration that may move the
    /// selection. Nothing is recorded before the first bind.
    pub fn record_selected_item(&mut self, current: usize) -> bool {
        if !self.has_bound {
            return false;
        }
        self.last_selected = Some(current);
        true
    }

    pub fn selected_item_memo(&self) -> Option<usize> {
        self.last_selected
    }

    /// Consumes the remembered selection.
    pub fn take_selected_item(&mut self) -> Option<usize> {
        self.last_selected.take()
    }
}

#[cfg(test)]
#[path = "tests/adapter_tests.rs"]
mod tests;
