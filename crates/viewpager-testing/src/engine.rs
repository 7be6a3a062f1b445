//! A headless virtualizing layout engine.
//!
//! `FakeLayoutEngine` lays out a window of pages around the current item,
//! the way a recycler-backed pager does. Pages leaving the window go to a
//! small cache where they stay bound; pages pushed out of the cache are
//! recycled into a pool and rebound later for other positions.

use std::collections::VecDeque;

use viewpager_core::collections::map::HashMap;
use viewpager_core::{HolderId, RangeChange, ScrollState, SlotAdapter, ViewId};
use viewpager_host::{ContentPadding, HostCallback, PagerHost};
use viewpager_transform::{PageSize, PageTransform, PageTransformer};

/// Pages laid out on each side of the current one when no limit is set.
pub const DEFAULT_OFFSCREEN_PAGES: usize = 1;
/// Detached holders kept bound before they are recycled.
pub const DEFAULT_CACHE_SIZE: usize = 2;

pub struct FakeLayoutEngine {
    item_count: usize,
    current: usize,
    horizontal: bool,
    offscreen_limit: Option<usize>,
    user_input: bool,
    overscroll_effect: bool,
    padding: ContentPadding,
    page_size: PageSize,
    cache_size: usize,

    attached: HashMap<usize, HolderId>,
    cache: VecDeque<(usize, HolderId)>,
    pool: Vec<HolderId>,
    dropped: Vec<HolderId>,

    transformer: Option<PageTransformer>,
    transforms: HashMap<ViewId, PageTransform>,

    fake_drag: Option<f32>,
    callbacks: Vec<HostCallback>,
    dirty: bool,
    layouts: usize,
}

impl Default for FakeLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLayoutEngine {
    pub fn new() -> Self {
        Self {
            item_count: 0,
            current: 0,
            horizontal: false,
            offscreen_limit: None,
            user_input: true,
            overscroll_effect: true,
            padding: ContentPadding::ZERO,
            page_size: PageSize::new(1080.0, 1920.0),
            cache_size: DEFAULT_CACHE_SIZE,
            attached: HashMap::default(),
            cache: VecDeque::new(),
            pool: Vec::new(),
            dropped: Vec::new(),
            transformer: None,
            transforms: HashMap::default(),
            fake_drag: None,
            callbacks: Vec::new(),
            dirty: true,
            layouts: 0,
        }
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn offscreen_limit(&self) -> Option<usize> {
        self.offscreen_limit
    }

    pub fn user_input_enabled(&self) -> bool {
        self.user_input
    }

    pub fn overscroll_effect(&self) -> bool {
        self.overscroll_effect
    }

    pub fn content_padding(&self) -> ContentPadding {
        self.padding
    }

    pub fn layout_count(&self) -> usize {
        self.layouts
    }

    /// Attached positions, sorted.
    pub fn attached_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.attached.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    pub fn holder_at(&self, position: usize) -> Option<HolderId> {
        self.attached.get(&position).copied()
    }

    pub fn cached_positions(&self) -> Vec<usize> {
        self.cache.iter().map(|(position, _)| *position).collect()
    }

    pub fn pooled_holders(&self) -> &[HolderId] {
        &self.pool
    }

    pub fn page_transform(&self, container: ViewId) -> PageTransform {
        self.transforms
            .get(&container)
            .copied()
            .unwrap_or(PageTransform::IDENTITY)
    }

    /// Forces a layout on the next pass, as a size change would.
    pub fn request_layout(&mut self) {
        self.dirty = true;
    }

    fn window(&self) -> std::ops::RangeInclusive<usize> {
        let limit = self.offscreen_limit.unwrap_or(DEFAULT_OFFSCREEN_PAGES);
        let last = self.item_count.saturating_sub(1);
        self.current.saturating_sub(limit)..=(self.current + limit).min(last)
    }

    fn main_extent(&self) -> f32 {
        if self.horizontal {
            self.page_size.width
        } else {
            self.page_size.height
        }
    }

    fn push(&mut self, callback: HostCallback) {
        self.callbacks.push(callback);
    }

    fn select(&mut self, index: usize, fake: bool) {
        if index == self.current {
            return;
        }
        self.current = index;
        self.dirty = true;
        self.push(HostCallback::PageSelected {
            position: index,
            fake,
        });
    }

    /// Shifts a position-keyed holder after a range change; `None` when the
    /// position was removed.
    fn shift_position(position: usize, change: RangeChange) -> Option<usize> {
        match change {
            RangeChange::Inserted { start, count } if position >= start => Some(position + count),
            RangeChange::Removed { start, count } if position >= start + count => {
                Some(position - count)
            }
            RangeChange::Removed { start, .. } if position >= start => None,
            _ => Some(position),
        }
    }

    fn detach_to_cache(&mut self, adapter: &mut SlotAdapter, position: usize, holder: HolderId) {
        self.cache.push_back((position, holder));
        while self.cache.len() > self.cache_size {
            if let Some((_, evicted)) = self.cache.pop_front() {
                self.recycle(adapter, evicted);
            }
        }
    }

    fn recycle(&mut self, adapter: &mut SlotAdapter, holder: HolderId) {
        adapter.recycle(holder);
        self.pool.push(holder);
    }

    fn attach(&mut self, adapter: &mut SlotAdapter, position: usize) {
        if let Some(index) = self.cache.iter().position(|(cached, _)| *cached == position) {
            if let Some((_, holder)) = self.cache.remove(index) {
                adapter.reattach(holder);
                self.attached.insert(position, holder);
                return;
            }
        }
        let holder = self.pool.pop().unwrap_or_else(|| adapter.create_holder());
        let outcome = adapter.bind(holder, position);
        log::trace!("engine bound position {position}: {outcome:?}");
        adapter.reattach(holder);
        self.attached.insert(position, holder);
    }

    fn apply_transforms(&mut self, adapter: &SlotAdapter) {
        let drag = self.fake_drag.unwrap_or(0.0) / self.page_size_main();
        let Some(transformer) = self.transformer.as_mut() else {
            return;
        };
        for (&position, &holder) in &self.attached {
            let Some(container) = adapter.holder_container(holder) else {
                continue;
            };
            let offset = position as f32 - self.current as f32 + drag;
            let page = self.transforms.entry(container).or_insert(PageTransform::IDENTITY);
            transformer.transform_page(container, page, self.page_size, offset);
        }
    }

    fn page_size_main(&self) -> f32 {
        self.main_extent().max(1.0)
    }
}

impl PagerHost for FakeLayoutEngine {
    fn current_item(&self) -> usize {
        self.current
    }

    fn set_current_item(&mut self, index: usize, smooth: bool) {
        if self.item_count == 0 {
            log::debug!("set_current_item({index}) with no items ignored");
            return;
        }
        let index = index.min(self.item_count - 1);
        if index == self.current {
            return;
        }
        if smooth {
            self.push(HostCallback::ScrollStateChanged {
                state: ScrollState::Settling,
                fake: false,
            });
        }
        self.select(index, false);
        self.push(HostCallback::PageScrolled {
            position: index,
            offset: 0.0,
            offset_pixels: 0,
            fake: false,
        });
        if smooth {
            self.push(HostCallback::ScrollStateChanged {
                state: ScrollState::Idle,
                fake: false,
            });
        }
    }

    fn begin_fake_drag(&mut self) -> bool {
        if self.fake_drag.is_some() {
            return false;
        }
        self.fake_drag = Some(0.0);
        self.push(HostCallback::ScrollStateChanged {
            state: ScrollState::Dragging,
            fake: true,
        });
        true
    }

    fn fake_drag_by(&mut self, offset_px: f32) -> bool {
        let Some(dragged) = self.fake_drag.as_mut() else {
            return false;
        };
        *dragged += offset_px;
        let total = *dragged;
        // Dragging toward negative offsets reveals the next page.
        let pages = -total / self.page_size_main();
        let position = (self.current as f32 + pages).floor().max(0.0);
        let fraction = self.current as f32 + pages - position;
        self.push(HostCallback::PageScrolled {
            position: position as usize,
            offset: fraction,
            offset_pixels: (fraction * self.main_extent()) as i32,
            fake: true,
        });
        true
    }

    fn end_fake_drag(&mut self) -> bool {
        let Some(dragged) = self.fake_drag.take() else {
            return false;
        };
        self.push(HostCallback::ScrollStateChanged {
            state: ScrollState::Settling,
            fake: true,
        });
        let pages = (-dragged / self.page_size_main()).round() as isize;
        let last = self.item_count.saturating_sub(1);
        let target = self.current.saturating_add_signed(pages).min(last);
        self.select(target, true);
        self.push(HostCallback::ScrollStateChanged {
            state: ScrollState::Idle,
            fake: false,
        });
        self.dirty = true;
        true
    }

    fn is_fake_dragging(&self) -> bool {
        self.fake_drag.is_some()
    }

    fn set_orientation(&mut self, horizontal: bool) {
        if self.horizontal != horizontal {
            self.horizontal = horizontal;
            self.dirty = true;
        }
    }

    fn set_offscreen_page_limit(&mut self, limit: Option<usize>) {
        self.offscreen_limit = limit;
        self.dirty = true;
    }

    fn set_user_input_enabled(&mut self, enabled: bool) {
        self.user_input = enabled;
    }

    fn set_overscroll_effect(&mut self, enabled: bool) {
        self.overscroll_effect = enabled;
    }

    fn set_content_padding(&mut self, padding: ContentPadding) {
        self.padding = padding;
        self.dirty = true;
    }

    fn notify_range(&mut self, change: RangeChange) {
        let attached = std::mem::take(&mut self.attached);
        for (position, holder) in attached {
            match Self::shift_position(position, change) {
                Some(position) => {
                    self.attached.insert(position, holder);
                }
                None => self.dropped.push(holder),
            }
        }
        let cache = std::mem::take(&mut self.cache);
        for (position, holder) in cache {
            match Self::shift_position(position, change) {
                Some(position) => self.cache.push_back((position, holder)),
                None => self.dropped.push(holder),
            }
        }
        match change {
            RangeChange::Inserted { count, .. } => self.item_count += count,
            RangeChange::Removed { count, .. } => {
                self.item_count = self.item_count.saturating_sub(count)
            }
        }
        let last = self.item_count.saturating_sub(1);
        if self.current > last {
            self.select(last, false);
        }
        self.dirty = true;
    }

    fn page_transformer_mut(&mut self) -> Option<&mut PageTransformer> {
        self.transformer.as_mut()
    }

    fn replace_page_transformer(
        &mut self,
        transformer: Option<PageTransformer>,
    ) -> Option<PageTransformer> {
        self.dirty = true;
        std::mem::replace(&mut self.transformer, transformer)
    }

    fn reset_page_transforms(&mut self, pages: &[ViewId]) {
        for page in pages {
            self.transforms.insert(*page, PageTransform::IDENTITY);
        }
        self.dirty = true;
    }

    fn layout(&mut self, adapter: &mut SlotAdapter) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.layouts += 1;
        self.item_count = adapter.item_count();

        for holder in std::mem::take(&mut self.dropped) {
            self.recycle(adapter, holder);
        }

        let window = self.window();
        let mut leaving: Vec<(usize, HolderId)> = self
            .attached
            .iter()
            .filter(|(position, _)| self.item_count == 0 || !window.contains(*position))
            .map(|(position, holder)| (*position, *holder))
            .collect();
        leaving.sort_unstable();
        for (position, holder) in leaving {
            self.attached.remove(&position);
            if position < self.item_count {
                self.detach_to_cache(adapter, position, holder);
            } else {
                self.recycle(adapter, holder);
            }
        }

        if self.item_count > 0 {
            for position in window {
                if !self.attached.contains_key(&position) {
                    self.attach(adapter, position);
                }
            }
        }
        self.apply_transforms(adapter);
    }

    fn take_callbacks(&mut self) -> Vec<HostCallback> {
        std::mem::take(&mut self.callbacks)
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
