use viewpager_core::ScrollState;

/// Turns the engine's selection callbacks into settled page changes.
///
/// A page is selected before its scroll finishes. The change is reported
/// once the scroll returns to idle, or immediately when nothing is
/// scrolling, and never twice in a row for the same position.
#[derive(Debug, Default, Clone)]
pub struct PageChangeTracker {
    scrolling: Option<ScrollState>,
    pending: Option<usize>,
    last: Option<usize>,
}

impl PageChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_changed(&self) -> Option<usize> {
        self.last
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling.is_some()
    }

    /// Returns the position whose change settled with this transition.
    pub fn on_scroll_state_changed(&mut self, state: ScrollState) -> Option<usize> {
        if state != ScrollState::Idle {
            self.scrolling = Some(state);
            return None;
        }
        self.scrolling = None;
        let position = self.pending.take()?;
        self.settle(position)
    }

    pub fn on_page_selected(&mut self, position: usize) -> Option<usize> {
        if self.scrolling.is_some() {
            self.pending = Some(position);
            return None;
        }
        self.settle(position)
    }

    fn settle(&mut self, position: usize) -> Option<usize> {
        if self.last == Some(position) {
            return None;
        }
        self.last = Some(position);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_while_idle_changes_immediately() {
        let mut tracker = PageChangeTracker::new();
        assert_eq!(tracker.on_page_selected(0), Some(0));
        assert_eq!(tracker.on_page_selected(0), None);
        assert_eq!(tracker.on_page_selected(2), Some(2));
    }

    #[test]
    fn selection_during_scroll_waits_for_idle() {
        let mut tracker = PageChangeTracker::new();
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Dragging), None);
        assert_eq!(tracker.on_page_selected(1), None);
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Settling), None);
        assert!(tracker.is_scrolling());
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Idle), Some(1));
        assert_eq!(tracker.last_changed(), Some(1));
    }

    #[test]
    fn latest_selection_wins_within_one_scroll() {
        let mut tracker = PageChangeTracker::new();
        tracker.on_scroll_state_changed(ScrollState::Dragging);
        tracker.on_page_selected(1);
        tracker.on_page_selected(2);
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Idle), Some(2));
    }

    #[test]
    fn scroll_back_to_same_page_reports_nothing() {
        let mut tracker = PageChangeTracker::new();
        tracker.on_page_selected(3);
        tracker.on_scroll_state_changed(ScrollState::Dragging);
        tracker.on_page_selected(3);
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Idle), None);
        assert_eq!(tracker.on_scroll_state_changed(ScrollState::Idle), None);
    }
}
