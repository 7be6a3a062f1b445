#![doc = r"Embedding surface for Viewpager: configuration, commands and page-change tracking."]

pub mod command;
pub mod config;
pub mod host;
pub mod pager;
pub mod tracker;

pub use command::{CommandArg, CommandError, PagerCommand};
pub use config::{PagerConfig, ScrollListeners};
pub use host::{ContentPadding, HostCallback, PagerHost};
pub use pager::{Pager, RESTORE_FALLBACK};
pub use tracker::PageChangeTracker;

pub mod prelude {
    pub use crate::command::{CommandArg, PagerCommand};
    pub use crate::config::{PagerConfig, ScrollListeners};
    pub use crate::host::{HostCallback, PagerHost};
    pub use crate::pager::Pager;
}
