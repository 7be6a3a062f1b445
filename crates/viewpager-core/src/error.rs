use std::fmt;

use crate::pool::SlotId;
use crate::view_tree::{ViewError, ViewId};

/// Errors reported by the child-view surface of the
/// [`SlotAdapter`](crate::SlotAdapter).
///
/// Layout engine callbacks (bind, recycle, reattach) never fail; they report
/// explicit outcomes and tolerate redundant notifications instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerError {
    ChildIndexOutOfRange { index: usize, len: usize },
    SlotInUse { slot: SlotId },
    /// The view is already a slot or the base layer.
    DuplicateChild { view: ViewId },
    View(ViewError),
}

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerError::ChildIndexOutOfRange { index, len } => {
                write!(f, "child index {index} out of range for {len} children")
            }
            PagerError::SlotInUse { slot } => {
                write!(f, "{slot} has been handed out and cannot be removed")
            }
            PagerError::DuplicateChild { view } => {
                write!(f, "view {view} is already a child of the pager")
            }
            PagerError::View(err) => write!(f, "view error: {err}"),
        }
    }
}

impl std::error::Error for PagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PagerError::View(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ViewError> for PagerError {
    fn from(err: ViewError) -> Self {
        PagerError::View(err)
    }
}
