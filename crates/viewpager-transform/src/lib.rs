//! Page transition effects for Viewpager
//!
//! This crate evaluates the built-in `card`, `zoomOut` and `depth` effects
//! as pure functions of a page's size and scroll position.

pub mod config;
pub mod transformer;

pub use config::{TransformerConfig, TransformerKind, TransformerOptions};
pub use transformer::{PageSize, PageTransform, PageTransformer, Pivot};

pub mod prelude {
    pub use crate::config::{TransformerConfig, TransformerKind, TransformerOptions};
    pub use crate::transformer::{PageSize, PageTransform, PageTransformer};
}
