//! Shared background view that follows the selected page.
//!
//! The base layer is a single view owned by the compositor. It is always
//! parented under the container of the selected position, at child index 0 so
//! it draws beneath that page's content. When the selected position has no
//! container yet, the request is remembered as the deferred target and
//! completed by the next bind of that position.

use crate::view_tree::{ViewError, ViewId, ViewTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLayerOutcome {
    /// The base layer was moved under the target container.
    Attached,
    /// The base layer already lives under the target container.
    AlreadyHosted,
    /// No container (or no base layer view) yet; the position was remembered.
    Deferred,
}

#[derive(Debug, Default)]
pub struct BaseLayerCompositor {
    view: Option<ViewId>,
    deferred: Option<usize>,
}

impl BaseLayerCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn deferred_target(&self) -> Option<usize> {
        self.deferred
    }

    /// Container currently hosting the base layer.
    pub fn host(&self, tree: &ViewTree) -> Option<ViewId> {
        self.view.and_then(|view| tree.parent(view))
    }

    /// Installs the base layer view, detaching and returning any previous one.
    pub fn set_view(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<ViewId> {
        let previous = self.view.replace(view);
        if let Some(old) = previous.filter(|old| *old != view) {
            tree.detach(old);
        }
        previous
    }

    /// Removes the base layer view from the compositor and from its parent.
    pub fn clear_view(&mut self, tree: &mut ViewTree) -> Option<ViewId> {
        let view = self.view.take()?;
        tree.detach(view);
        Some(view)
    }

    /// Re-parents the base layer under `container`, the container currently
    /// showing `position`. `None` defers until that position is bound.
    ///
    /// A new request always replaces the previous deferred target.
    pub fn bind(
        &mut self,
        tree: &mut ViewTree,
        position: usize,
        container: Option<ViewId>,
    ) -> Result<BaseLayerOutcome, ViewError> {
        match (self.view, container) {
            (Some(view), Some(container)) => {
                self.deferred = None;
                reparent(tree, view, container)
            }
            _ => {
                log::trace!("base layer deferred to position {position}");
                self.deferred = Some(position);
                Ok(BaseLayerOutcome::Deferred)
            }
        }
    }

    /// Completes a deferred request if `position` is its target.
    pub fn complete_deferred(
        &mut self,
        tree: &mut ViewTree,
        position: usize,
        container: ViewId,
    ) -> Result<Option<BaseLayerOutcome>, ViewError> {
        if self.deferred != Some(position) {
            return Ok(None);
        }
        let Some(view) = self.view else {
            return Ok(None);
        };
        self.deferred = None;
        reparent(tree, view, container).map(Some)
    }

    /// Moves or drops the deferred target after an item range change.
    pub fn shift_target(&mut self, from: usize, delta: isize, removed_end: Option<usize>) {
        let Some(target) = self.deferred else {
            return;
        };
        self.deferred = match removed_end {
            Some(end) if target >= from && target < end => None,
            Some(end) => Some(crate::pool::shift(target, end, delta)),
            None => Some(crate::pool::shift(target, from, delta)),
        };
    }
}

fn reparent(
    tree: &mut ViewTree,
    view: ViewId,
    container: ViewId,
) -> Result<BaseLayerOutcome, ViewError> {
    if tree.parent(view) == Some(container) {
        return Ok(BaseLayerOutcome::AlreadyHosted);
    }
    tree.detach(view);
    tree.attach(container, view, Some(0))?;
    log::trace!("base layer {view} moved under {container}");
    Ok(BaseLayerOutcome::Attached)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ViewTree, ViewId, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let first = tree.create_container();
        let second = tree.create_container();
        let background = tree.create_view();
        (tree, first, second, background)
    }

    #[test]
    fn bind_without_container_defers() {
        let (mut tree, first, _, background) = setup();
        let mut compositor = BaseLayerCompositor::new();
        compositor.set_view(&mut tree, background);

        assert_eq!(
            compositor.bind(&mut tree, 3, None),
            Ok(BaseLayerOutcome::Deferred)
        );
        assert_eq!(compositor.deferred_target(), Some(3));

        assert_eq!(compositor.complete_deferred(&mut tree, 2, first), Ok(None));
        assert_eq!(
            compositor.complete_deferred(&mut tree, 3, first),
            Ok(Some(BaseLayerOutcome::Attached))
        );
        assert_eq!(compositor.host(&tree), Some(first));
        assert_eq!(compositor.deferred_target(), None);
    }

    #[test]
    fn newer_request_overwrites_deferred_target() {
        let (mut tree, _, _, background) = setup();
        let mut compositor = BaseLayerCompositor::new();
        compositor.set_view(&mut tree, background);

        compositor.bind(&mut tree, 1, None).unwrap();
        compositor.bind(&mut tree, 2, None).unwrap();
        assert_eq!(compositor.deferred_target(), Some(2));
    }

    #[test]
    fn immediate_bind_clears_stale_deferred_target() {
        let (mut tree, first, _, background) = setup();
        let mut compositor = BaseLayerCompositor::new();
        compositor.set_view(&mut tree, background);

        compositor.bind(&mut tree, 5, None).unwrap();
        compositor.bind(&mut tree, 1, Some(first)).unwrap();
        assert_eq!(compositor.deferred_target(), None);
    }

    #[test]
    fn reparent_goes_to_index_zero_after_detach() {
        let (mut tree, first, second, background) = setup();
        let content = tree.create_view();
        tree.attach(second, content, None).unwrap();
        let mut compositor = BaseLayerCompositor::new();
        compositor.set_view(&mut tree, background);

        compositor.bind(&mut tree, 0, Some(first)).unwrap();
        assert_eq!(
            compositor.bind(&mut tree, 0, Some(first)),
            Ok(BaseLayerOutcome::AlreadyHosted)
        );
        assert_eq!(
            compositor.bind(&mut tree, 1, Some(second)),
            Ok(BaseLayerOutcome::Attached)
        );
        assert!(tree.children(first).is_empty());
        assert_eq!(tree.children(second), &[background, content]);
    }

    #[test]
    fn deferred_target_follows_range_changes() {
        let mut compositor = BaseLayerCompositor::new();
        compositor.deferred = Some(4);

        compositor.shift_target(2, 3, None);
        assert_eq!(compositor.deferred_target(), Some(7));

        compositor.shift_target(6, -2, Some(8));
        assert_eq!(compositor.deferred_target(), None);
    }
}
