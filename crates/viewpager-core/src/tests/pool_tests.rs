use super::*;

#[test]
fn fresh_slots_are_claimed_in_order() {
    let mut pool = SlotPool::new();
    pool.push_view(10);
    pool.push_view(11);

    assert_eq!(pool.claim_fresh(), Some(SlotId(0)));
    assert_eq!(pool.claim_fresh(), Some(SlotId(1)));
    assert_eq!(pool.claim_fresh(), None);
    assert_eq!(pool.consumed(), 2);

    pool.push_view(12);
    assert!(pool.fresh_available());
    assert_eq!(pool.claim_fresh(), Some(SlotId(2)));
    assert_eq!(pool.view(SlotId(2)), Some(12));
}

#[test]
fn insert_before_consumed_keeps_fresh_cursor_aligned() {
    let mut pool = SlotPool::new();
    pool.push_view(10);
    pool.push_view(11);
    pool.claim_fresh();

    pool.insert_view(0, 9);
    assert_eq!(pool.consumed(), 2);
    assert_eq!(pool.claim_fresh(), Some(SlotId(2)));
    assert_eq!(pool.view(SlotId(2)), Some(11));
}

#[test]
fn remove_view_returns_state() {
    let mut pool = SlotPool::new();
    pool.push_view(10);
    pool.push_view(11);
    pool.claim_fresh();
    pool.set_state(SlotId(0), SlotState::Bound(HolderId(3)));

    assert_eq!(
        pool.remove_view(SlotId(0)),
        Some((10, SlotState::Bound(HolderId(3))))
    );
    assert_eq!(pool.consumed(), 0);
    assert_eq!(pool.view(SlotId(0)), Some(11));
    assert_eq!(pool.remove_view(SlotId(4)), None);
}

#[test]
fn unknown_slot_state_is_free() {
    let pool = SlotPool::new();
    assert!(pool.state(SlotId(7)).is_free());
    assert_eq!(pool.state(SlotId(7)).holder(), None);
}

#[test]
fn binding_table_stays_bidirectional() {
    let mut table = BindingTable::new();
    table.bind(0, SlotId(0));
    table.bind(1, SlotId(1));

    // Rebinding slot 0 to position 3 evicts position 0.
    table.bind(3, SlotId(0));
    assert_eq!(table.slot_for(0), None);
    assert_eq!(table.slot_for(3), Some(SlotId(0)));
    assert_eq!(table.position_of(SlotId(0)), Some(3));

    // Binding position 1 to slot 2 evicts slot 1.
    table.bind(1, SlotId(2));
    assert_eq!(table.position_of(SlotId(1)), None);
    assert_eq!(table.entries(), vec![(1, SlotId(2)), (3, SlotId(0))]);
}

#[test]
fn unbind_by_either_side() {
    let mut table = BindingTable::new();
    table.bind(4, SlotId(1));
    table.bind(5, SlotId(2));

    assert_eq!(table.unbind_slot(SlotId(1)), Some(4));
    assert_eq!(table.unbind_position(5), Some(SlotId(2)));
    assert_eq!(table.unbind_position(5), None);
    assert!(table.is_empty());
}

#[test]
fn shift_positions_moves_tail_only() {
    let mut table = BindingTable::new();
    table.bind(1, SlotId(0));
    table.bind(4, SlotId(1));
    table.bind(6, SlotId(2));

    table.shift_positions(4, 2);
    assert_eq!(
        table.entries(),
        vec![(1, SlotId(0)), (6, SlotId(1)), (8, SlotId(2))]
    );

    table.shift_positions(6, -3);
    assert_eq!(
        table.entries(),
        vec![(1, SlotId(0)), (3, SlotId(1)), (5, SlotId(2))]
    );
}

#[test]
fn shift_slots_keeps_positions() {
    let mut table = BindingTable::new();
    table.bind(0, SlotId(0));
    table.bind(2, SlotId(2));

    table.shift_slots(1, 1);
    assert_eq!(table.entries(), vec![(0, SlotId(0)), (2, SlotId(3))]);
    assert_eq!(table.position_of(SlotId(3)), Some(2));
}
