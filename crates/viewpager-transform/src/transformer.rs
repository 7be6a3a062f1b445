//! Per-page visual transforms driven by the page's scroll position.
//!
//! `position` is the page's offset from the selected page in page units:
//! `0.0` is fully selected, `-1.0` one page before, `1.0` one page after.
//! Each effect only writes the properties it owns, so a page keeps whatever
//! the previous frame left in the others. Changing orientation or effect
//! leaves stale properties behind; those pages are reported through
//! [`PageTransformer::take_reset_request`] and must go back to
//! [`PageTransform::IDENTITY`].

use viewpager_core::collections::map::HashSet;
use viewpager_core::ViewId;

use crate::config::{TransformerConfig, TransformerKind};

const PIVOT_CENTER: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn main_axis(self, horizontal: bool) -> f32 {
        if horizontal {
            self.width
        } else {
            self.height
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Pivot {
    pub fn center(size: PageSize) -> Self {
        Self {
            x: size.width * PIVOT_CENTER,
            y: size.height * PIVOT_CENTER,
        }
    }
}

/// Visual properties of one page. `pivot: None` means the page center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub scale: f32,
    pub alpha: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub pivot: Option<Pivot>,
}

impl PageTransform {
    pub const IDENTITY: PageTransform = PageTransform {
        scale: 1.0,
        alpha: 1.0,
        translation_x: 0.0,
        translation_y: 0.0,
        pivot: None,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn set_translation(&mut self, horizontal: bool, value: f32) {
        if horizontal {
            self.translation_x = value;
        } else {
            self.translation_y = value;
        }
    }
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug)]
pub struct PageTransformer {
    config: TransformerConfig,
    horizontal: bool,
    pages: HashSet<ViewId>,
    reset_pending: bool,
}

impl PageTransformer {
    pub fn new(config: TransformerConfig, horizontal: bool) -> Self {
        Self {
            config,
            horizontal,
            pages: HashSet::default(),
            reset_pending: false,
        }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    pub fn kind(&self) -> TransformerKind {
        self.config.kind
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    /// Returns whether the orientation changed.
    pub fn set_horizontal(&mut self, horizontal: bool) -> bool {
        if horizontal == self.horizontal {
            return false;
        }
        self.horizontal = horizontal;
        self.reset_pending = true;
        true
    }

    /// Replaces the tunables; switching the effect schedules a reset.
    pub fn set_config(&mut self, config: TransformerConfig) {
        if config.kind != self.config.kind {
            log::debug!("page transformer {} -> {}", self.config.kind, config.kind);
            self.reset_pending = true;
        }
        self.config = config;
    }

    /// Pages that must be reset to [`PageTransform::IDENTITY`], sorted by
    /// id. Empty unless orientation or effect changed since the last call.
    pub fn take_reset_request(&mut self) -> Vec<ViewId> {
        if !std::mem::take(&mut self.reset_pending) {
            return Vec::new();
        }
        self.all_pages()
    }

    /// Every page this transformer has touched, sorted by id.
    pub fn all_pages(&self) -> Vec<ViewId> {
        let mut pages: Vec<ViewId> = self.pages.iter().copied().collect();
        pages.sort_unstable();
        pages
    }

    pub fn transform_page(
        &mut self,
        page: ViewId,
        current: &mut PageTransform,
        size: PageSize,
        position: f32,
    ) {
        self.pages.insert(page);
        match self.config.kind {
            TransformerKind::Card => self.card(current, size, position),
            TransformerKind::ZoomOut => self.zoom_out(current, size, position),
            TransformerKind::Depth => self.depth(current, size, position),
        }
    }

    fn card(&self, page: &mut PageTransform, size: PageSize, position: f32) {
        let min_scale = self.config.min_scale;
        if min_scale < 1.0 {
            let mut scale = min_scale;
            let mut pivot = Pivot::center(size);
            let main = if position < -1.0 {
                size.main_axis(self.horizontal)
            } else if position <= 1.0 {
                scale = (1.0 - position.abs()) * (1.0 - min_scale) + min_scale;
                size.main_axis(self.horizontal) * ((1.0 - position) * PIVOT_CENTER)
            } else {
                0.0
            };
            if self.horizontal {
                pivot.x = main;
            } else {
                pivot.y = main;
            }
            page.scale = scale;
            page.pivot = Some(pivot);
        }

        let min_alpha = self.config.min_alpha;
        if min_alpha < 1.0 {
            page.alpha = if (-1.0..=1.0).contains(&position) {
                (1.0 - position.abs()) * (1.0 - min_alpha) + min_alpha
            } else {
                min_alpha
            };
        }

        let padding = self.config.padding;
        if padding > 0.0 {
            let margin = if self.config.margin > 0.0 {
                self.config.margin
            } else {
                padding / 2.0
            };
            page.set_translation(self.horizontal, margin * position);
        }
    }

    fn zoom_out(&self, page: &mut PageTransform, size: PageSize, position: f32) {
        if !(-1.0..=1.0).contains(&position) {
            page.alpha = 0.0;
            return;
        }
        let min_scale = self.config.min_scale;
        let min_alpha = self.config.min_alpha;
        let scale = min_scale.max(1.0 - position.abs());
        let vertical_margin = size.height * (1.0 - scale) / 2.0;
        let horizontal_margin = size.width * (1.0 - scale) / 2.0;
        let sign = if position < 0.0 { -1.0 } else { 1.0 };
        page.scale = scale;
        let translation = if self.horizontal {
            sign * (vertical_margin / 2.0 - horizontal_margin)
        } else {
            sign * (horizontal_margin / 2.0 - vertical_margin)
        };
        page.set_translation(self.horizontal, translation);
        // A minimum scale of one leaves no range to fade across.
        let progress = if min_scale < 1.0 {
            (scale - min_scale) / (1.0 - min_scale)
        } else {
            1.0
        };
        page.alpha = min_alpha + progress * (1.0 - min_alpha);
    }

    fn depth(&self, page: &mut PageTransform, size: PageSize, position: f32) {
        if position < -1.0 {
            page.alpha = 0.0;
        } else if position <= 0.0 {
            page.alpha = 1.0;
            page.set_translation(self.horizontal, 0.0);
            page.scale = 1.0;
        } else if position <= 1.0 {
            page.alpha = 1.0 - position;
            page.set_translation(self.horizontal, -position * size.main_axis(self.horizontal));
            let min_scale = self.config.min_scale;
            page.scale = min_scale + (1.0 - min_scale) * (1.0 - position.abs());
        } else {
            page.alpha = 0.0;
        }
    }
}

#[cfg(test)]
#[path = "tests/transformer_tests.rs"]
mod tests;
