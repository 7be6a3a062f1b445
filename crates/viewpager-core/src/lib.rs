#![doc = r"Slot recycling pool and position binding state machine for a paging container."]

pub mod adapter;
pub mod base_layer;
pub mod collections;
mod error;
pub mod event;
pub mod pool;
pub mod recycler;
pub mod sequence;
pub mod view_tree;

pub use adapter::{AdapterConfig, AdapterStats, BindOutcome, SlotAdapter, SlotMode};
pub use base_layer::{BaseLayerCompositor, BaseLayerOutcome};
pub use error::PagerError;
pub use event::{EventSink, NoopSink, PagerEvent, RecordingSink, ScrollState};
pub use pool::{BindingTable, HolderId, SlotId, SlotPool, SlotState};
pub use recycler::{BackfillQueue, RecycledSet};
pub use sequence::{ItemSequence, RangeChange, MAX_ITEM_COUNT};
pub use view_tree::{SequentialIds, ViewError, ViewId, ViewIdGenerator, ViewKind, ViewTree};

pub mod prelude {
    pub use crate::adapter::{AdapterConfig, BindOutcome, SlotAdapter, SlotMode};
    pub use crate::event::{EventSink, PagerEvent, ScrollState};
    pub use crate::pool::{HolderId, SlotId};
    pub use crate::sequence::RangeChange;
    pub use crate::view_tree::{ViewId, ViewTree};
}
