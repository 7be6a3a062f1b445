//! Structural checks over a [`SlotAdapter`].
//!
//! Every check here must hold after any sequence of adapter operations.
//! The scenario and property tests call [`assert_invariants`] after each step.

use std::fmt;

use viewpager_core::collections::map::HashMap;
use viewpager_core::{HolderId, SlotAdapter, SlotId, SlotState, ViewId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two positions map to the same slot.
    SharedSlot {
        slot: SlotId,
        positions: (usize, usize),
    },
    /// A bound position lies outside the item sequence.
    PositionOutOfRange { position: usize, count: usize },
    /// A binding points at a slot that nobody holds.
    BindingToFreeSlot { position: usize, slot: SlotId },
    /// A slot claims a holder that does not claim it back.
    HolderMismatch {
        slot: SlotId,
        holder: HolderId,
        holder_slot: Option<SlotId>,
    },
    /// A held slot's view sits somewhere other than its holder's container.
    MisplacedView {
        slot: SlotId,
        view: ViewId,
        parent: Option<ViewId>,
        expected: ViewId,
    },
    /// A container shows more than one slot view.
    CrowdedContainer { container: ViewId, views: usize },
    /// The recycled set and the slot states disagree.
    RecycledMismatch { slot: SlotId, state: SlotState },
    /// A pending backfill position is past the item count.
    StaleBackfill { position: usize, count: usize },
    /// The base layer is parented but not under a holder container at index 0.
    MisplacedBaseLayer {
        view: ViewId,
        parent: ViewId,
        index: Option<usize>,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::SharedSlot { slot, positions } => write!(
                f,
                "{slot} bound to positions {} and {}",
                positions.0, positions.1
            ),
            InvariantViolation::PositionOutOfRange { position, count } => {
                write!(f, "position {position} bound with only {count} items")
            }
            InvariantViolation::BindingToFreeSlot { position, slot } => {
                write!(f, "position {position} bound to free {slot}")
            }
            InvariantViolation::HolderMismatch {
                slot,
                holder,
                holder_slot,
            } => write!(
                f,
                "{slot} names {holder}, which holds {holder_slot:?}"
            ),
            InvariantViolation::MisplacedView {
                slot,
                view,
                parent,
                expected,
            } => write!(
                f,
                "{slot} view {view} parented under {parent:?}, expected {expected}"
            ),
            InvariantViolation::CrowdedContainer { container, views } => {
                write!(f, "container {container} shows {views} slot views")
            }
            InvariantViolation::RecycledMismatch { slot, state } => {
                write!(f, "recycled set disagrees with {slot} state {state:?}")
            }
            InvariantViolation::StaleBackfill { position, count } => {
                write!(f, "backfill for position {position} with only {count} items")
            }
            InvariantViolation::MisplacedBaseLayer {
                view,
                parent,
                index,
            } => write!(
                f,
                "base layer {view} under {parent} at child index {index:?}"
            ),
        }
    }
}

/// Returns every violated invariant, in check order.
pub fn check_invariants(adapter: &SlotAdapter) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    check_bindings(adapter, &mut violations);
    check_slots(adapter, &mut violations);
    check_containers(adapter, &mut violations);
    check_backfill(adapter, &mut violations);
    check_base_layer(adapter, &mut violations);
    violations
}

/// Panics with a dump of the adapter when any invariant is violated.
#[track_caller]
pub fn assert_invariants(adapter: &SlotAdapter) {
    let violations = check_invariants(adapter);
    if violations.is_empty() {
        return;
    }
    let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
    panic!(
        "{} invariant violation(s):\n  {}\nstats: {:?}\nbindings: {:?}",
        violations.len(),
        lines.join("\n  "),
        adapter.stats(),
        adapter.bindings().entries()
    );
}

fn check_bindings(adapter: &SlotAdapter, violations: &mut Vec<InvariantViolation>) {
    let count = adapter.item_count();
    let mut seen: HashMap<SlotId, usize> = HashMap::default();
    for (position, slot) in adapter.bindings().entries() {
        if let Some(previous) = seen.insert(slot, position) {
            violations.push(InvariantViolation::SharedSlot {
                slot,
                positions: (previous, position),
            });
        }
        if position >= count {
            violations.push(InvariantViolation::PositionOutOfRange { position, count });
        }
        if adapter.pool().state(slot).is_free() {
            violations.push(InvariantViolation::BindingToFreeSlot { position, slot });
        }
    }
}

fn check_slots(adapter: &SlotAdapter, violations: &mut Vec<InvariantViolation>) {
    for (slot, view, state) in adapter.pool().iter() {
        if state.is_recycled() != adapter.recycled().contains(slot) {
            violations.push(InvariantViolation::RecycledMismatch { slot, state });
        }
        let Some(holder) = state.holder() else {
            continue;
        };
        let holder_slot = adapter.holder_slot(holder);
        if holder_slot != Some(slot) {
            violations.push(InvariantViolation::HolderMismatch {
                slot,
                holder,
                holder_slot,
            });
        }
        if let Some(expected) = adapter.holder_container(holder) {
            let parent = adapter.tree().parent(view);
            if parent != Some(expected) {
                violations.push(InvariantViolation::MisplacedView {
                    slot,
                    view,
                    parent,
                    expected,
                });
            }
        }
    }
    for slot in adapter.recycled().slots() {
        let state = adapter.pool().state(slot);
        if !state.is_recycled() {
            violations.push(InvariantViolation::RecycledMismatch { slot, state });
        }
    }
}

fn check_containers(adapter: &SlotAdapter, violations: &mut Vec<InvariantViolation>) {
    let base = adapter.base_layer().view();
    for (_, container, _) in adapter.holders() {
        let views = adapter
            .tree()
            .children(container)
            .iter()
            .filter(|child| Some(**child) != base)
            .count();
        if views > 1 {
            violations.push(InvariantViolation::CrowdedContainer { container, views });
        }
    }
}

fn check_backfill(adapter: &SlotAdapter, violations: &mut Vec<InvariantViolation>) {
    let count = adapter.item_count();
    for position in adapter.backfill().positions() {
        if position >= count {
            violations.push(InvariantViolation::StaleBackfill { position, count });
        }
    }
}

fn check_base_layer(adapter: &SlotAdapter, violations: &mut Vec<InvariantViolation>) {
    let Some(view) = adapter.base_layer().view() else {
        return;
    };
    let Some(parent) = adapter.tree().parent(view) else {
        return;
    };
    let index = adapter
        .tree()
        .children(parent)
        .iter()
        .position(|child| *child == view);
    let is_container = adapter
        .holders()
        .any(|(_, container, _)| container == parent);
    if !is_container || index != Some(0) {
        violations.push(InvariantViolation::MisplacedBaseLayer {
            view,
            parent,
            index,
        });
    }
}
