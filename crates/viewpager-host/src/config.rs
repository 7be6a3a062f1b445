use viewpager_core::{AdapterConfig, PagerEvent, SlotMode};
use viewpager_transform::TransformerOptions;

/// Scroll callbacks the embedding application subscribed to. Everything is
/// off by default; unsubscribed callbacks are never sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollListeners {
    pub page_scroll: bool,
    pub page_scroll_state_changed: bool,
    pub page_selected: bool,
    pub page_changed: bool,
}

impl ScrollListeners {
    pub const NONE: ScrollListeners = ScrollListeners {
        page_scroll: false,
        page_scroll_state_changed: false,
        page_selected: false,
        page_changed: false,
    };

    pub const ALL: ScrollListeners = ScrollListeners {
        page_scroll: true,
        page_scroll_state_changed: true,
        page_selected: true,
        page_changed: true,
    };

    /// Builds the set from `(callback name, subscribed)` pairs. Unknown
    /// names are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::NONE, |listeners, (name, on)| listeners.with(name, on))
    }

    pub fn with(mut self, name: &str, subscribed: bool) -> Self {
        match name {
            "onPageScroll" => self.page_scroll = subscribed,
            "onPageScrollStateChanged" => self.page_scroll_state_changed = subscribed,
            "onPageSelected" => self.page_selected = subscribed,
            "onPageChanged" => self.page_changed = subscribed,
            other => log::debug!("unknown scroll listener {other:?} ignored"),
        }
        self
    }

    /// Whether `event` may be sent. Events outside the scroll category are
    /// always allowed.
    pub fn allows(&self, event: &PagerEvent) -> bool {
        match event {
            PagerEvent::PageScroll { .. } => self.page_scroll,
            PagerEvent::PageScrollStateChanged { .. } => self.page_scroll_state_changed,
            PagerEvent::PageSelected { .. } => self.page_selected,
            PagerEvent::PageChanged { .. } => self.page_changed,
            _ => true,
        }
    }
}

/// Pager configuration.
///
/// `adapter` is fixed at construction. Everything else can be changed later
/// through the matching [`Pager`](crate::Pager) setter.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerConfig {
    pub adapter: AdapterConfig,
    pub horizontal: bool,
    /// `None` leaves the engine default.
    pub offscreen_page_limit: Option<usize>,
    pub swipe_enabled: bool,
    pub overscroll_effect: bool,
    pub transformer: Option<TransformerOptions>,
    pub listeners: ScrollListeners,
    /// Pixels per density-independent pixel.
    pub density: f32,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterConfig::default(),
            horizontal: false,
            offscreen_page_limit: None,
            swipe_enabled: true,
            overscroll_effect: true,
            transformer: None,
            listeners: ScrollListeners::NONE,
            density: 1.0,
        }
    }
}

impl PagerConfig {
    pub fn with_mode(mut self, mode: SlotMode) -> Self {
        self.adapter.mode = mode;
        self
    }

    pub fn with_base_layer(mut self, base_layer: bool) -> Self {
        self.adapter.base_layer = base_layer;
        self
    }

    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Zero selects the engine default.
    pub fn with_offscreen_page_limit(mut self, limit: usize) -> Self {
        self.offscreen_page_limit = offscreen_limit(limit);
        self
    }

    pub fn with_swipe_enabled(mut self, enabled: bool) -> Self {
        self.swipe_enabled = enabled;
        self
    }

    pub fn with_overscroll_effect(mut self, enabled: bool) -> Self {
        self.overscroll_effect = enabled;
        self
    }

    pub fn with_transformer(mut self, transformer: TransformerOptions) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_listeners(mut self, listeners: ScrollListeners) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }
}

pub(crate) fn offscreen_limit(limit: usize) -> Option<usize> {
    (limit > 0).then_some(limit)
}
