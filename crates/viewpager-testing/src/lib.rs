//! Testing utilities and harness for Viewpager

pub mod engine;
pub mod invariants;
pub mod rule;

pub use engine::{FakeLayoutEngine, DEFAULT_CACHE_SIZE, DEFAULT_OFFSCREEN_PAGES};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use rule::PagerTestRule;

pub mod prelude {
    pub use crate::engine::FakeLayoutEngine;
    pub use crate::invariants::assert_invariants;
    pub use crate::rule::PagerTestRule;
}
