//! Arena of display surfaces manipulated by the pager.
//!
//! The pager never renders anything itself; it only moves surfaces between
//! containers. [`ViewTree`] records exactly that: every view has at most one
//! parent and every container keeps an ordered child list. Attaching a view
//! that still has a parent is rejected, which makes "detach before attach" a
//! checked rule rather than a convention.

use std::fmt;

use smallvec::SmallVec;

use crate::collections::map::HashMap;

/// Identifier of a display surface in the [`ViewTree`].
pub type ViewId = usize;

/// Source of identifiers for newly created views.
///
/// The tree owns its generator, so two pagers never share an id space and
/// tests can start from a known value.
pub trait ViewIdGenerator {
    fn next_id(&mut self) -> ViewId;
}

/// Generator that counts upward from a starting value (zero by default).
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: ViewId,
}

impl SequentialIds {
    pub fn starting_at(first: ViewId) -> Self {
        Self { next: first }
    }
}

impl ViewIdGenerator for SequentialIds {
    fn next_id(&mut self) -> ViewId {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Leaf content supplied by the embedding application.
    Content,
    /// Surface that can host children (a layout engine slot container).
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    Missing { id: ViewId },
    NotAContainer { id: ViewId },
    AlreadyParented { child: ViewId, parent: ViewId },
    Cycle { id: ViewId },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Missing { id } => write!(f, "view {id} missing"),
            ViewError::NotAContainer { id } => write!(f, "view {id} cannot host children"),
            ViewError::AlreadyParented { child, parent } => {
                write!(f, "view {child} is still attached to {parent}")
            }
            ViewError::Cycle { id } => write!(f, "view {id} cannot be attached to itself"),
        }
    }
}

impl std::error::Error for ViewError {}

#[derive(Debug)]
struct ViewNode {
    kind: ViewKind,
    parent: Option<ViewId>,
    children: SmallVec<[ViewId; 2]>,
}

impl ViewNode {
    fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }
}

pub struct ViewTree {
    nodes: HashMap<ViewId, ViewNode>,
    ids: Box<dyn ViewIdGenerator>,
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(SequentialIds::default()))
    }

    pub fn with_id_generator(ids: Box<dyn ViewIdGenerator>) -> Self {
        Self {
            nodes: HashMap::default(),
            ids,
        }
    }

    pub fn create_view(&mut self) -> ViewId {
        self.create(ViewKind::Content)
    }

    pub fn create_container(&mut self) -> ViewId {
        self.create(ViewKind::Container)
    }

    fn create(&mut self, kind: ViewKind) -> ViewId {
        let id = self.ids.next_id();
        if self.nodes.insert(id, ViewNode::new(kind)).is_some() {
            log::warn!("view id {id} reused by generator; previous view dropped");
        }
        id
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn kind(&self, id: ViewId) -> Option<ViewKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attaches `child` under `parent` at `index` (appended when `None` or
    /// past the end).
    pub fn attach(
        &mut self,
        parent: ViewId,
        child: ViewId,
        index: Option<usize>,
    ) -> Result<(), ViewError> {
        if parent == child {
            return Err(ViewError::Cycle { id: child });
        }
        let child_node = self.nodes.get(&child).ok_or(ViewError::Missing { id: child })?;
        if let Some(current) = child_node.parent {
            return Err(ViewError::AlreadyParented {
                child,
                parent: current,
            });
        }
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(ViewError::Missing { id: parent })?;
        if parent_node.kind != ViewKind::Container {
            return Err(ViewError::NotAContainer { id: parent });
        }
        let at = index
            .unwrap_or(parent_node.children.len())
            .min(parent_node.children.len());
        parent_node.children.insert(at, child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Detaches `child` from its parent, returning the former parent.
    pub fn detach(&mut self, child: ViewId) -> Option<ViewId> {
        let parent = self.nodes.get_mut(&child)?.parent.take()?;
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|candidate| *candidate != child);
        }
        Some(parent)
    }

    /// Detaches every child of `container`, returning them in their former order.
    pub fn remove_all_children(&mut self, container: ViewId) -> SmallVec<[ViewId; 2]> {
        let Some(node) = self.nodes.get_mut(&container) else {
            return SmallVec::new();
        };
        let removed = std::mem::take(&mut node.children);
        for child in &removed {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
        }
        removed
    }

    /// Removes `id` from the arena; its children become unparented.
    pub fn remove(&mut self, id: ViewId) -> Result<(), ViewError> {
        if !self.contains(id) {
            return Err(ViewError::Missing { id });
        }
        self.detach(id);
        self.remove_all_children(id);
        self.nodes.remove(&id);
        Ok(())
    }

    pub fn dump(&self, root: ViewId) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, root, 0);
        output
    }

    fn dump_node(&self, output: &mut String, id: ViewId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.nodes.get(&id) {
            Some(node) => {
                output.push_str(&format!("{}[{}] {:?}\n", indent, id, node.kind));
                for child in &node.children {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            None => output.push_str(&format!("{}[{}] (missing)\n", indent, id)),
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tree_tests.rs"]
mod tests;
