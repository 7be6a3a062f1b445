//! The embedding-facing pager: configuration, commands and page tracking
//! wired around a [`SlotAdapter`] and a [`PagerHost`].

use std::rc::Rc;

use viewpager_core::{
    EventSink, PagerError, PagerEvent, RangeChange, SlotAdapter, ViewId,
};
use viewpager_transform::{PageTransformer, TransformerOptions};
use web_time::{Duration, Instant};

use crate::command::{CommandArg, CommandError, PagerCommand};
use crate::config::{offscreen_limit, PagerConfig, ScrollListeners};
use crate::host::{ContentPadding, HostCallback, PagerHost};
use crate::tracker::PageChangeTracker;

/// How long a recorded selection waits for a page change to restore it
/// before [`Pager::poll`] does.
pub const RESTORE_FALLBACK: Duration = Duration::from_millis(10);

/// Layout passes per pump before giving up on a host that keeps producing
/// callbacks.
const MAX_PUMP_PASSES: usize = 16;

/// Offset of the settling drag used when the recorded item is already current.
const SETTLE_DRAG_PX: f32 = 1.0;

pub struct Pager<H: PagerHost> {
    adapter: SlotAdapter,
    host: H,
    config: PagerConfig,
    sink: Rc<dyn EventSink>,
    tracker: PageChangeTracker,
    restore_deadline: Option<Instant>,
}

impl<H: PagerHost> Pager<H> {
    pub fn new(host: H, config: PagerConfig, sink: Rc<dyn EventSink>) -> Self {
        let adapter = SlotAdapter::new(config.adapter, Rc::clone(&sink));
        let mut pager = Self {
            adapter,
            host,
            config,
            sink,
            tracker: PageChangeTracker::new(),
            restore_deadline: None,
        };
        pager.apply_config();
        pager
    }

    fn apply_config(&mut self) {
        self.host.set_orientation(self.config.horizontal);
        self.host
            .set_offscreen_page_limit(self.config.offscreen_page_limit);
        self.host.set_user_input_enabled(self.config.swipe_enabled);
        self.host
            .set_overscroll_effect(self.config.overscroll_effect);
        let transformer = self.config.transformer.clone();
        self.set_transformer(transformer);
    }

    pub fn adapter(&self) -> &SlotAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut SlotAdapter {
        &mut self.adapter
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &PageChangeTracker {
        &self.tracker
    }

    pub fn current_item(&self) -> usize {
        self.host.current_item()
    }

    // ── Child views ──────────────────────────────────────────────────────

    pub fn create_child_view(&mut self) -> ViewId {
        self.adapter.tree_mut().create_view()
    }

    pub fn add_child_view(&mut self, view: ViewId, index: usize) -> Result<(), PagerError> {
        if let Some(change) = self.adapter.add_child_view(view, index)? {
            self.host.notify_range(change);
        }
        Ok(())
    }

    pub fn remove_child_view(&mut self, index: usize) -> Result<(), PagerError> {
        if let Some(change) = self.adapter.remove_child_view(index)? {
            self.host.notify_range(change);
        }
        Ok(())
    }

    pub fn child_count(&self) -> usize {
        self.adapter.child_count()
    }

    pub fn child_at(&self, index: usize) -> Option<ViewId> {
        self.adapter.child_at(index)
    }

    // ── Item sequence ────────────────────────────────────────────────────

    pub fn item_count(&self) -> usize {
        self.adapter.item_count()
    }

    pub fn set_item_count(&mut self, count: usize) {
        let change = self.adapter.set_item_count(count);
        self.notify(change);
    }

    pub fn insert_item_range(&mut self, start: usize, count: usize) {
        let change = self.adapter.insert_item_range(start, count);
        self.notify(change);
    }

    pub fn remove_item_range(&mut self, start: usize, count: usize) {
        let change = self.adapter.remove_item_range(start, count);
        self.notify(change);
    }

    fn notify(&mut self, change: Option<RangeChange>) {
        if let Some(change) = change {
            self.host.notify_range(change);
        }
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub fn set_horizontal(&mut self, horizontal: bool) {
        if horizontal == self.config.horizontal {
            return;
        }
        self.record_selected_item();
        self.config.horizontal = horizontal;
        self.host.set_orientation(horizontal);
        let update = self.host.page_transformer_mut().map(|transformer| {
            transformer.set_horizontal(horizontal);
            (
                transformer.config().page_padding(),
                transformer.take_reset_request(),
            )
        });
        if let Some((padding, pages)) = update {
            self.host
                .set_content_padding(ContentPadding::main_axis(padding, horizontal));
            self.reset_pages(&pages);
        }
    }

    /// Installs, retunes or (with `None` or an unknown name) removes the
    /// page transition effect.
    pub fn set_transformer(&mut self, options: Option<TransformerOptions>) {
        let horizontal = self.config.horizontal;
        let old_padding = self
            .host
            .page_transformer_mut()
            .map_or(0.0, |transformer| transformer.config().page_padding());
        let resolved = options
            .as_ref()
            .and_then(|options| options.resolve(self.config.density));

        let Some(config) = resolved else {
            self.config.transformer = None;
            if self.host.page_transformer_mut().is_none() {
                return;
            }
            self.record_selected_item();
            if old_padding != 0.0 {
                self.host.set_content_padding(ContentPadding::ZERO);
            }
            if let Some(previous) = self.host.replace_page_transformer(None) {
                self.reset_pages(&previous.all_pages());
            }
            return;
        };

        self.record_selected_item();
        let padding = config.page_padding();
        if padding != old_padding {
            self.host
                .set_content_padding(ContentPadding::main_axis(padding, horizontal));
        }
        let pages = self.host.page_transformer_mut().map(|transformer| {
            transformer.set_config(config);
            transformer.take_reset_request()
        });
        match pages {
            Some(pages) => self.reset_pages(&pages),
            None => {
                self.host
                    .replace_page_transformer(Some(PageTransformer::new(config, horizontal)));
            }
        }
        self.config.transformer = options;
    }

    fn reset_pages(&mut self, pages: &[ViewId]) {
        if !pages.is_empty() {
            self.host.reset_page_transforms(pages);
        }
    }

    /// Zero selects the engine default.
    pub fn set_offscreen_page_limit(&mut self, limit: usize) {
        self.config.offscreen_page_limit = offscreen_limit(limit);
        self.host
            .set_offscreen_page_limit(self.config.offscreen_page_limit);
    }

    pub fn set_swipe_enabled(&mut self, enabled: bool) {
        self.config.swipe_enabled = enabled;
        self.host.set_user_input_enabled(enabled);
    }

    pub fn set_overscroll_effect(&mut self, enabled: bool) {
        self.config.overscroll_effect = enabled;
        self.host.set_overscroll_effect(enabled);
    }

    pub fn set_listeners(&mut self, listeners: ScrollListeners) {
        self.config.listeners = listeners;
    }

    pub fn set_current_index(&mut self, index: usize) {
        self.host.set_current_item(index, false);
    }

    // ── Commands ─────────────────────────────────────────────────────────

    /// Parses and runs a command. Malformed commands are logged and change
    /// nothing.
    pub fn receive_command(&mut self, name: &str, args: &[CommandArg]) -> Result<(), CommandError> {
        match PagerCommand::parse(name, args) {
            Ok(command) => {
                self.execute(command);
                Ok(())
            }
            Err(err) => {
                log::warn!("command ignored: {err}");
                Err(err)
            }
        }
    }

    pub fn execute(&mut self, command: PagerCommand) {
        log::trace!("command {}", command.name());
        match command {
            PagerCommand::SetCount { count, selected } => {
                let jump_first = selected.filter(|selected| *selected < self.item_count());
                if let Some(index) = jump_first {
                    self.host.set_current_item(index, false);
                }
                self.set_item_count(count);
                if let Some(index) = selected.filter(|_| jump_first.is_none()) {
                    self.host.set_current_item(index, false);
                }
            }
            PagerCommand::InsertCount { start, count } => self.insert_item_range(start, count),
            PagerCommand::RemoveCount { start, count } => self.remove_item_range(start, count),
            PagerCommand::SetCurrentIndex { index, smooth } => {
                self.host.set_current_item(index, smooth);
            }
            PagerCommand::GetCurrentIndex { token } => {
                let position = self.host.current_item();
                self.emit(PagerEvent::CurrentPosition { token, position });
            }
            PagerCommand::BeginFakeDrag => {
                if !self.host.begin_fake_drag() {
                    log::debug!("fake drag already in progress");
                }
            }
            PagerCommand::FakeDragBy { offset } => {
                if !self.host.fake_drag_by(offset * self.config.density) {
                    log::debug!("fakeDragBy without an active fake drag");
                }
            }
            PagerCommand::EndFakeDrag => {
                if !self.host.end_fake_drag() {
                    log::debug!("endFakeDrag without an active fake drag");
                }
            }
        }
    }

    fn emit(&self, event: PagerEvent) {
        if self.config.listeners.allows(&event) {
            self.sink.emit(event);
        }
    }

    // ── Selection memo ───────────────────────────────────────────────────

    /// Remembers the current item ahead of a reconfiguration and arms the
    /// fallback deadline. Returns whether anything was recorded.
    pub fn record_selected_item(&mut self) -> bool {
        if !self.adapter.record_selected_item(self.host.current_item()) {
            return false;
        }
        self.restore_deadline
            .get_or_insert_with(|| Instant::now() + RESTORE_FALLBACK);
        true
    }

    /// Deadline after which [`poll`](Self::poll) restores the recorded item.
    pub fn next_event_time(&self) -> Option<Instant> {
        self.restore_deadline
    }

    /// Restores the recorded item, if any. Returns whether one was pending.
    fn restore_selected_item(&mut self) -> bool {
        let Some(item) = self.adapter.take_selected_item() else {
            return false;
        };
        self.restore_deadline = None;
        if item == self.host.current_item() {
            // Same index, but a multi-page layout may still sit between pages.
            self.host.begin_fake_drag();
            self.host.fake_drag_by(SETTLE_DRAG_PX);
            self.host.end_fake_drag();
        } else {
            self.host.set_current_item(item, false);
        }
        log::debug!("restored selected item {item}");
        true
    }

    // ── Host callbacks ───────────────────────────────────────────────────

    /// Lets the host lay out and dispatches its callbacks until it settles.
    /// Returns the number of callbacks dispatched.
    pub fn pump(&mut self) -> usize {
        let mut dispatched = 0;
        for _ in 0..MAX_PUMP_PASSES {
            self.host.layout(&mut self.adapter);
            let callbacks = self.host.take_callbacks();
            if callbacks.is_empty() {
                return dispatched;
            }
            dispatched += callbacks.len();
            for callback in callbacks {
                self.dispatch(callback);
            }
        }
        log::warn!("host still reporting callbacks after {MAX_PUMP_PASSES} layout passes");
        dispatched
    }

    /// Pumps, then runs the restore fallback if its deadline passed.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut dispatched = self.pump();
        if self.restore_deadline.is_some_and(|deadline| deadline <= now) {
            self.restore_deadline = None;
            if self.restore_selected_item() {
                dispatched += self.pump();
            }
        }
        dispatched
    }

    pub fn dispatch(&mut self, callback: HostCallback) {
        match callback {
            HostCallback::ScrollStateChanged { state, fake } => {
                self.emit(PagerEvent::PageScrollStateChanged { state, fake });
                if let Some(position) = self.tracker.on_scroll_state_changed(state) {
                    self.on_page_changed(position, fake);
                }
            }
            HostCallback::PageScrolled {
                position,
                offset,
                offset_pixels,
                fake,
            } => self.emit(PagerEvent::PageScroll {
                position,
                offset,
                offset_pixels,
                fake,
            }),
            HostCallback::PageSelected { position, fake } => {
                self.emit(PagerEvent::PageSelected { position, fake });
                if let Some(position) = self.tracker.on_page_selected(position) {
                    self.on_page_changed(position, fake);
                }
            }
        }
    }

    fn on_page_changed(&mut self, position: usize, fake: bool) {
        self.emit(PagerEvent::PageChanged { position, fake });
        if !self.restore_selected_item() {
            self.adapter.bind_base_layer(position);
        }
    }
}

#[cfg(test)]
#[path = "tests/pager_tests.rs"]
mod tests;
