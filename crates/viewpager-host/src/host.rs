//! The layout engine as seen from the pager.

use viewpager_core::{RangeChange, ScrollState, SlotAdapter, ViewId};
use viewpager_transform::PageTransformer;

/// Raw page callbacks reported by the layout engine. `fake` is whether a
/// fake drag was in progress when the callback fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCallback {
    ScrollStateChanged {
        state: ScrollState,
        fake: bool,
    },
    PageScrolled {
        position: usize,
        offset: f32,
        offset_pixels: i32,
        fake: bool,
    },
    PageSelected {
        position: usize,
        fake: bool,
    },
}

/// Content padding in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentPadding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ContentPadding {
    pub const ZERO: ContentPadding = ContentPadding {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Equal padding on both ends of the scroll axis; non-positive is zero.
    pub fn main_axis(padding: f32, horizontal: bool) -> Self {
        let padding = padding as i32;
        if padding <= 0 {
            return Self::ZERO;
        }
        if horizontal {
            Self {
                left: padding,
                right: padding,
                ..Self::ZERO
            }
        } else {
            Self {
                top: padding,
                bottom: padding,
                ..Self::ZERO
            }
        }
    }
}

/// A virtualizing layout engine that positions holders along one axis.
///
/// The engine drives the [`SlotAdapter`] from [`layout`](Self::layout):
/// creating holders, binding positions into them and recycling or
/// reattaching them as pages scroll in and out. Everything else is a
/// request from the pager that takes effect on the next layout.
pub trait PagerHost {
    fn current_item(&self) -> usize;
    fn set_current_item(&mut self, index: usize, smooth: bool);

    fn begin_fake_drag(&mut self) -> bool;
    /// Drags by `offset_px` pixels. Returns `false` when no fake drag is active.
    fn fake_drag_by(&mut self, offset_px: f32) -> bool;
    fn end_fake_drag(&mut self) -> bool;
    fn is_fake_dragging(&self) -> bool;

    fn set_orientation(&mut self, horizontal: bool);
    /// `None` restores the engine's default.
    fn set_offscreen_page_limit(&mut self, limit: Option<usize>);
    fn set_user_input_enabled(&mut self, enabled: bool);
    /// Edge glow when scrolling past the first or last page.
    fn set_overscroll_effect(&mut self, enabled: bool);
    fn set_content_padding(&mut self, padding: ContentPadding);

    fn notify_range(&mut self, change: RangeChange);

    fn page_transformer_mut(&mut self) -> Option<&mut PageTransformer>;
    /// Installs `transformer`, returning the previous one.
    fn replace_page_transformer(
        &mut self,
        transformer: Option<PageTransformer>,
    ) -> Option<PageTransformer>;
    /// Restores the listed pages to their untransformed state.
    fn reset_page_transforms(&mut self, pages: &[ViewId]);

    /// Runs any pending layout against `adapter`.
    fn layout(&mut self, adapter: &mut SlotAdapter);
    /// Drains the callbacks produced since the last call, oldest first.
    fn take_callbacks(&mut self) -> Vec<HostCallback>;
}
