//! Logical item count of the pager.
//!
//! The count only changes through explicit set/insert/remove calls. Each
//! change is reported as a [`RangeChange`] so the layout engine can be told
//! which positions appeared or disappeared.

/// A contiguous range of positions that was inserted or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChange {
    Inserted { start: usize, count: usize },
    Removed { start: usize, count: usize },
}

impl RangeChange {
    pub fn start(&self) -> usize {
        match *self {
            RangeChange::Inserted { start, .. } | RangeChange::Removed { start, .. } => start,
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            RangeChange::Inserted { count, .. } | RangeChange::Removed { count, .. } => count,
        }
    }
}

/// Largest item count a sequence holds. Range deltas are signed, so counts
/// stay within `isize`.
pub const MAX_ITEM_COUNT: usize = isize::MAX as usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemSequence {
    count: usize,
}

impl ItemSequence {
    pub fn new(count: usize) -> Self {
        Self {
            count: count.min(MAX_ITEM_COUNT),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn contains(&self, position: usize) -> bool {
        position < self.count
    }

    /// Grows or shrinks the tail so that the sequence holds `count` items.
    pub fn set_count(&mut self, count: usize) -> Option<RangeChange> {
        if count == self.count {
            return None;
        }
        if count > self.count {
            let start = self.count;
            self.insert_range(start, count - start)
        } else {
            self.remove_range(count, self.count - count)
        }
    }

    /// Inserts `count` positions at `start`; a start past the end appends.
    pub fn insert_range(&mut self, start: usize, count: usize) -> Option<RangeChange> {
        if count == 0 {
            return None;
        }
        let start = if start > self.count {
            log::warn!(
                "insert at {start} past item count {}; appending instead",
                self.count
            );
            self.count
        } else {
            start
        };
        let room = MAX_ITEM_COUNT - self.count;
        let count = if count > room {
            log::warn!("insert of {count} at {start} clamped to {room}; item count is full");
            room
        } else {
            count
        };
        if count == 0 {
            return None;
        }
        self.count += count;
        Some(RangeChange::Inserted { start, count })
    }

    /// Removes up to `count` positions starting at `start`.
    ///
    /// The range is clamped to the current count; a start at or past the end
    /// removes nothing.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Option<RangeChange> {
        if start >= self.count || count == 0 {
            if count > 0 {
                log::warn!(
                    "remove of {count} at {start} ignored; item count is {}",
                    self.count
                );
            }
            return None;
        }
        let clamped = count.min(self.count - start);
        if clamped != count {
            log::warn!("remove of {count} at {start} clamped to {clamped}");
        }
        self.count -= clamped;
        Some(RangeChange::Removed {
            start,
            count: clamped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_count_grows_at_tail() {
        let mut items = ItemSequence::new(2);
        assert_eq!(
            items.set_count(5),
            Some(RangeChange::Inserted { start: 2, count: 3 })
        );
        assert_eq!(items.count(), 5);
    }

    #[test]
    fn set_count_shrinks_tail() {
        let mut items = ItemSequence::new(5);
        assert_eq!(
            items.set_count(1),
            Some(RangeChange::Removed { start: 1, count: 4 })
        );
        assert_eq!(items.count(), 1);
        assert_eq!(items.set_count(1), None);
    }

    #[test]
    fn remove_is_clamped() {
        let mut items = ItemSequence::new(3);
        assert_eq!(
            items.remove_range(1, 10),
            Some(RangeChange::Removed { start: 1, count: 2 })
        );
        assert_eq!(items.remove_range(4, 1), None);
        assert_eq!(items.count(), 1);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut items = ItemSequence::new(1);
        assert_eq!(
            items.insert_range(7, 2),
            Some(RangeChange::Inserted { start: 1, count: 2 })
        );
        assert_eq!(items.insert_range(0, 0), None);
        assert_eq!(items.count(), 3);
    }

    #[test]
    fn huge_inserts_saturate_at_max_count() {
        let mut items = ItemSequence::new(2);
        assert_eq!(
            items.insert_range(0, usize::MAX),
            Some(RangeChange::Inserted {
                start: 0,
                count: MAX_ITEM_COUNT - 2
            })
        );
        assert_eq!(items.count(), MAX_ITEM_COUNT);
        assert_eq!(items.insert_range(0, 1), None);
        assert_eq!(items.count(), MAX_ITEM_COUNT);

        assert_eq!(items.set_count(usize::MAX), None);
        assert_eq!(
            items.remove_range(0, usize::MAX),
            Some(RangeChange::Removed {
                start: 0,
                count: MAX_ITEM_COUNT
            })
        );
        assert_eq!(items.count(), 0);
    }
}
