use std::rc::Rc;

use viewpager_core::{PagerError, PagerEvent, RecordingSink, SlotAdapter, ViewId};
use viewpager_host::{CommandArg, CommandError, Pager, PagerCommand, PagerConfig};
use web_time::{Duration, Instant};

use crate::engine::FakeLayoutEngine;
use crate::invariants::assert_invariants;

/// Headless harness for exercising a pager in tests.
///
/// `PagerTestRule` owns a [`Pager`] driven by a [`FakeLayoutEngine`] and
/// records every event the pager emits. Each helper that changes the pager
/// settles it afterwards: the engine lays out, its callbacks are dispatched,
/// and the adapter's structural invariants are asserted.
pub struct PagerTestRule {
    pager: Pager<FakeLayoutEngine>,
    sink: RecordingSink,
}

impl PagerTestRule {
    /// Create a rule with a default engine.
    pub fn new(config: PagerConfig) -> Self {
        Self::with_engine(FakeLayoutEngine::new(), config)
    }

    pub fn with_engine(engine: FakeLayoutEngine, config: PagerConfig) -> Self {
        let sink = RecordingSink::new();
        let pager = Pager::new(engine, config, Rc::new(sink.clone()));
        Self { pager, sink }
    }

    /// Supplies `count` new child views, appended after the existing ones.
    pub fn supply_views(&mut self, count: usize) -> Result<Vec<ViewId>, PagerError> {
        let base = usize::from(self.pager.config().adapter.base_layer);
        let mut views = Vec::with_capacity(count);
        for _ in 0..count {
            let view = self.pager.create_child_view();
            let index = self.adapter().pool().len() + base;
            self.pager.add_child_view(view, index)?;
            views.push(view);
        }
        self.settle();
        Ok(views)
    }

    /// Supplies the base layer view as child 0.
    pub fn supply_base_layer(&mut self) -> Result<ViewId, PagerError> {
        let view = self.pager.create_child_view();
        self.pager.add_child_view(view, 0)?;
        self.settle();
        Ok(view)
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.pager.set_item_count(count);
        self.settle();
    }

    pub fn scroll_to(&mut self, index: usize, smooth: bool) {
        self.pager
            .execute(PagerCommand::SetCurrentIndex { index, smooth });
        self.settle();
    }

    /// Fake-drags by whole pages; positive values move forward.
    pub fn swipe(&mut self, pages: isize) {
        let extent = self.page_extent() / self.pager.config().density;
        self.pager.execute(PagerCommand::BeginFakeDrag);
        self.pager.execute(PagerCommand::FakeDragBy {
            offset: -(pages as f32) * extent,
        });
        self.pager.execute(PagerCommand::EndFakeDrag);
        self.settle();
    }

    pub fn send_command(&mut self, name: &str, args: &[CommandArg]) -> Result<(), CommandError> {
        let result = self.pager.receive_command(name, args);
        self.settle();
        result
    }

    /// Lays out and dispatches until the engine goes quiet, then checks the
    /// adapter. Returns the number of callbacks dispatched.
    pub fn settle(&mut self) -> usize {
        let dispatched = self.pager.pump();
        assert_invariants(self.pager.adapter());
        dispatched
    }

    /// Runs the selection restore fallback as if its deadline had passed.
    /// Returns whether a deadline was armed.
    pub fn run_restore_fallback(&mut self) -> bool {
        let Some(deadline) = self.pager.next_event_time() else {
            return false;
        };
        self.pager.poll(deadline + Duration::from_millis(1));
        assert_invariants(self.pager.adapter());
        true
    }

    /// Polls at `now + elapsed`.
    pub fn advance_time(&mut self, elapsed: Duration) -> usize {
        let dispatched = self.pager.poll(Instant::now() + elapsed);
        assert_invariants(self.pager.adapter());
        dispatched
    }

    /// Child view currently shown at `position`, if its page is laid out.
    pub fn view_at(&self, position: usize) -> Option<ViewId> {
        let container = self.adapter().container_for_position(position)?;
        let base = self.adapter().base_layer().view();
        self.adapter()
            .tree()
            .children(container)
            .iter()
            .copied()
            .find(|child| Some(*child) != base)
    }

    pub fn events(&self) -> Vec<PagerEvent> {
        self.sink.events()
    }

    pub fn take_events(&self) -> Vec<PagerEvent> {
        self.sink.take()
    }

    pub fn count_events(&self, name: &str) -> usize {
        self.sink.count_named(name)
    }

    pub fn pager(&self) -> &Pager<FakeLayoutEngine> {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Pager<FakeLayoutEngine> {
        &mut self.pager
    }

    pub fn engine(&self) -> &FakeLayoutEngine {
        self.pager.host()
    }

    pub fn adapter(&self) -> &SlotAdapter {
        self.pager.adapter()
    }

    /// Dump the view tree under every holder container.
    pub fn dump_tree(&self) -> String {
        self.adapter()
            .holders()
            .map(|(_, container, _)| self.adapter().tree().dump(container))
            .collect()
    }

    fn page_extent(&self) -> f32 {
        let size = self.engine().page_size();
        if self.engine().is_horizontal() {
            size.width
        } else {
            size.height
        }
    }
}
