//! Transformer selection and its tunables.

use std::fmt;

/// Built-in page transition effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformerKind {
    /// Several pages per screen; neighbours shrink and fade toward the edges.
    Card,
    ZoomOut,
    Depth,
}

impl TransformerKind {
    pub const ALL: [TransformerKind; 3] = [
        TransformerKind::Card,
        TransformerKind::ZoomOut,
        TransformerKind::Depth,
    ];

    /// Parses the effect name used by the embedding application. Unknown
    /// names select no effect.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "card" => Some(TransformerKind::Card),
            "zoomOut" => Some(TransformerKind::ZoomOut),
            "depth" => Some(TransformerKind::Depth),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformerKind::Card => "card",
            TransformerKind::ZoomOut => "zoomOut",
            TransformerKind::Depth => "depth",
        }
    }

    pub fn default_min_scale(self) -> f32 {
        match self {
            TransformerKind::Depth => 0.75,
            _ => 0.85,
        }
    }

    pub fn default_min_alpha(self) -> f32 {
        match self {
            TransformerKind::ZoomOut => 0.5,
            _ => 1.0,
        }
    }

    /// Only the card effect shows neighbouring pages through content padding.
    pub fn supports_padding(self) -> bool {
        matches!(self, TransformerKind::Card)
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved transformer settings. Lengths are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformerConfig {
    pub kind: TransformerKind,
    pub min_scale: f32,
    pub min_alpha: f32,
    pub margin: f32,
    pub padding: f32,
}

impl TransformerConfig {
    pub fn new(kind: TransformerKind) -> Self {
        Self {
            kind,
            min_scale: kind.default_min_scale(),
            min_alpha: kind.default_min_alpha(),
            margin: 0.0,
            padding: 0.0,
        }
    }

    /// A negative scale selects the kind's default.
    pub fn with_min_scale(mut self, scale: f32) -> Self {
        self.min_scale = if scale < 0.0 {
            self.kind.default_min_scale()
        } else {
            scale
        };
        self
    }

    /// A negative alpha selects the kind's default.
    pub fn with_min_alpha(mut self, alpha: f32) -> Self {
        self.min_alpha = if alpha < 0.0 {
            self.kind.default_min_alpha()
        } else {
            alpha
        };
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Content padding the host must apply; zero for kinds without padding.
    pub fn page_padding(&self) -> f32 {
        if self.kind.supports_padding() {
            self.padding
        } else {
            0.0
        }
    }
}

/// Transformer settings as supplied by the embedding application: an effect
/// name plus optional tunables, lengths in density-independent pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformerOptions {
    pub kind: Option<String>,
    pub alpha: Option<f32>,
    pub scale: Option<f32>,
    pub margin: Option<f32>,
    pub padding: Option<f32>,
}

impl TransformerOptions {
    pub fn named(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Resolves against `density` (pixels per dp). `None` when the name is
    /// missing or unknown, which means "no effect".
    pub fn resolve(&self, density: f32) -> Option<TransformerConfig> {
        let name = self.kind.as_deref()?;
        let Some(kind) = TransformerKind::parse(name) else {
            log::warn!("unknown page transformer {name:?}; using the default slide");
            return None;
        };
        let mut config = TransformerConfig::new(kind)
            .with_min_alpha(self.alpha.unwrap_or(-1.0))
            .with_min_scale(self.scale.unwrap_or(-1.0))
            .with_margin(self.margin.map_or(0.0, |margin| margin * density));
        if kind.supports_padding() {
            config = config.with_padding(self.padding.map_or(0.0, |padding| padding * density));
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_their_names() {
        for kind in TransformerKind::ALL {
            assert_eq!(TransformerKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransformerKind::parse("cube"), None);
    }

    #[test]
    fn negative_values_select_kind_defaults() {
        let depth = TransformerConfig::new(TransformerKind::Depth)
            .with_min_scale(-1.0)
            .with_min_alpha(-1.0);
        assert_eq!(depth.min_scale, 0.75);
        assert_eq!(depth.min_alpha, 1.0);

        let zoom = TransformerConfig::new(TransformerKind::ZoomOut).with_min_alpha(-3.0);
        assert_eq!(zoom.min_alpha, 0.5);
        assert_eq!(zoom.min_scale, 0.85);
    }

    #[test]
    fn margin_is_never_negative() {
        let config = TransformerConfig::new(TransformerKind::Card).with_margin(-4.0);
        assert_eq!(config.margin, 0.0);
    }

    #[test]
    fn options_scale_lengths_by_density() {
        let config = TransformerOptions::named("card")
            .with_margin(10.0)
            .with_padding(20.0)
            .resolve(2.0)
            .unwrap();
        assert_eq!(config.margin, 20.0);
        assert_eq!(config.page_padding(), 40.0);
    }

    #[test]
    fn padding_is_ignored_outside_card() {
        let config = TransformerOptions::named("depth")
            .with_padding(20.0)
            .resolve(1.0)
            .unwrap();
        assert_eq!(config.padding, 0.0);
        assert_eq!(config.page_padding(), 0.0);
    }

    #[test]
    fn unknown_or_missing_name_resolves_to_none() {
        assert_eq!(TransformerOptions::named("flip").resolve(1.0), None);
        assert_eq!(TransformerOptions::default().resolve(1.0), None);
    }
}
