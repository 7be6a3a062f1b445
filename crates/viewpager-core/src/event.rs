//! Messages the pager sends to the embedding application.
//!
//! Delivery is fire-and-forget through an [`EventSink`]. The core only emits
//! [`PagerEvent::NeedNewChildView`] and [`PagerEvent::SlotBound`]; the other
//! variants are produced by the host surface and share the same channel.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::pool::SlotId;

#[derive(Debug, Clone, PartialEq)]
pub enum PagerEvent {
    /// The pool and the recycled set are both empty; supply another child view.
    NeedNewChildView,
    /// Slot `from` now shows position `to`; its content must be re-rendered.
    SlotBound { from: SlotId, to: usize },
    PageScroll {
        position: usize,
        offset: f32,
        offset_pixels: i32,
        fake: bool,
    },
    PageScrollStateChanged { state: ScrollState, fake: bool },
    PageSelected { position: usize, fake: bool },
    PageChanged { position: usize, fake: bool },
    /// Answer to a "get current position" request, correlated by `token`.
    CurrentPosition { token: String, position: usize },
}

impl PagerEvent {
    /// Name used on the wire toward the embedding application.
    pub fn name(&self) -> &'static str {
        match self {
            PagerEvent::NeedNewChildView => "addViewHolder",
            PagerEvent::SlotBound { .. } => "bindViewHolder",
            PagerEvent::PageScroll { .. } => "onPageScroll",
            PagerEvent::PageScrollStateChanged { .. } => "onPageScrollStateChanged",
            PagerEvent::PageSelected { .. } => "onPageSelected",
            PagerEvent::PageChanged { .. } => "onPageChanged",
            PagerEvent::CurrentPosition { .. } => "getCurrentIndex",
        }
    }

    /// Whether this is one of the scroll callbacks the embedding application
    /// subscribes to individually.
    pub fn is_scroll_event(&self) -> bool {
        matches!(
            self,
            PagerEvent::PageScroll { .. }
                | PagerEvent::PageScrollStateChanged { .. }
                | PagerEvent::PageSelected { .. }
                | PagerEvent::PageChanged { .. }
        )
    }
}

impl fmt::Display for PagerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerEvent::NeedNewChildView => write!(f, "{}", self.name()),
            PagerEvent::SlotBound { from, to } => {
                write!(f, "{} from={} to={}", self.name(), from.raw(), to)
            }
            PagerEvent::PageScroll {
                position,
                offset,
                offset_pixels,
                fake,
            } => write!(
                f,
                "{} position={position} offset={offset} offsetPixels={offset_pixels} fake={fake}",
                self.name()
            ),
            PagerEvent::PageScrollStateChanged { state, fake } => {
                write!(f, "{} state={} fake={fake}", self.name(), state.code())
            }
            PagerEvent::PageSelected { position, fake }
            | PagerEvent::PageChanged { position, fake } => {
                write!(f, "{} position={position} fake={fake}", self.name())
            }
            PagerEvent::CurrentPosition { token, position } => {
                write!(f, "{} index={token} item={position}", self.name())
            }
        }
    }
}

/// Scroll state reported by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Dragging,
    Settling,
}

impl ScrollState {
    pub fn code(self) -> i32 {
        match self {
            ScrollState::Idle => 0,
            ScrollState::Dragging => 1,
            ScrollState::Settling => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ScrollState::Idle),
            1 => Some(ScrollState::Dragging),
            2 => Some(ScrollState::Settling),
            _ => None,
        }
    }
}

/// Outbound channel toward the embedding application.
pub trait EventSink {
    fn emit(&self, event: PagerEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, event: PagerEvent) {
        log::trace!("dropped {event}");
    }
}

/// Sink that keeps every event; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<PagerEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PagerEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<PagerEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PagerEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Rc<S> {
    fn emit(&self, event: PagerEvent) {
        (**self).emit(event);
    }
}
