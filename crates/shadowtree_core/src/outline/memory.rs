//! In-memory outline store.
//!
//! # Responsibility
//! - Provide a complete `OutlineStore` implementation for hosts that
//!   materialize an outline themselves, and for tests.
//! - Provide structural mutation helpers (add, rename, retag, detach).
//!
//! # Invariants
//! - Handles stay valid for the store's lifetime; detached nodes keep
//!   their slot but disappear from parent/child/root listings.
//! - `ensure_id` allocates exactly once per node.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::node::{FlagSource, NodeHandle, NodeId};
use crate::outline::OutlineStore;
use std::cell::RefCell;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct NodeRecord {
    id: Option<NodeId>,
    title: String,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
    tags: BTreeSet<String>,
    flags: BTreeSet<String>,
    detached: bool,
}

impl NodeRecord {
    fn new(title: String, parent: Option<NodeHandle>) -> Self {
        Self {
            id: None,
            title,
            parent,
            children: Vec::new(),
            tags: BTreeSet::new(),
            flags: BTreeSet::new(),
            detached: false,
        }
    }
}

/// Single-threaded in-memory outline.
///
/// Interior mutability keeps the `OutlineStore` read contract on `&self`
/// while still allowing lazy id allocation and test-driven restructuring.
/// The synchronization model is single-threaded by design, so `RefCell`
/// is sufficient.
#[derive(Debug, Default)]
pub struct MemoryOutline {
    nodes: RefCell<Vec<NodeRecord>>,
}

impl MemoryOutline {
    /// Creates an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parentless node and returns its handle.
    pub fn add_root(&self, title: impl Into<String>) -> NodeHandle {
        self.push(NodeRecord::new(title.into(), None))
    }

    /// Appends a child under `parent` and returns its handle.
    pub fn add_child(&self, parent: NodeHandle, title: impl Into<String>) -> NodeHandle {
        let handle = self.push(NodeRecord::new(title.into(), Some(parent)));
        self.nodes.borrow_mut()[parent.raw()].children.push(handle);
        handle
    }

    /// Replaces the node's display title.
    pub fn rename(&self, node: NodeHandle, title: impl Into<String>) {
        self.nodes.borrow_mut()[node.raw()].title = title.into();
    }

    /// Adds a non-inheritable marker tag.
    pub fn add_tag(&self, node: NodeHandle, tag: impl Into<String>) {
        self.nodes.borrow_mut()[node.raw()].tags.insert(tag.into());
    }

    /// Removes a non-inheritable marker tag.
    pub fn remove_tag(&self, node: NodeHandle, tag: &str) {
        self.nodes.borrow_mut()[node.raw()].tags.remove(tag);
    }

    /// Sets an inheritable boolean property on the node itself.
    pub fn set_flag(&self, node: NodeHandle, name: impl Into<String>) {
        self.nodes.borrow_mut()[node.raw()].flags.insert(name.into());
    }

    /// Clears an inheritable boolean property from the node itself.
    ///
    /// Ancestor-provided values are unaffected; the node may still see
    /// the property as inherited afterwards.
    pub fn clear_flag(&self, node: NodeHandle, name: &str) {
        self.nodes.borrow_mut()[node.raw()].flags.remove(name);
    }

    /// Detaches a node and its whole subtree from the outline.
    ///
    /// Handles inside the subtree stay allocated but no longer appear in
    /// parent, child or root listings.
    pub fn detach_subtree(&self, node: NodeHandle) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.raw()].parent {
            nodes[parent.raw()].children.retain(|child| *child != node);
        }
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            nodes[current.raw()].detached = true;
            pending.extend(nodes[current.raw()].children.iter().copied());
        }
    }

    fn push(&self, record: NodeRecord) -> NodeHandle {
        let mut nodes = self.nodes.borrow_mut();
        let handle = NodeHandle::from_raw(nodes.len());
        nodes.push(record);
        handle
    }
}

impl OutlineStore for MemoryOutline {
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        let nodes = self.nodes.borrow();
        nodes[node.raw()]
            .parent
            .filter(|parent| !nodes[parent.raw()].detached)
    }

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        let nodes = self.nodes.borrow();
        nodes[node.raw()]
            .children
            .iter()
            .copied()
            .filter(|child| !nodes[child.raw()].detached)
            .collect()
    }

    fn roots(&self) -> Vec<NodeHandle> {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .enumerate()
            .filter(|(_, record)| record.parent.is_none() && !record.detached)
            .map(|(index, _)| NodeHandle::from_raw(index))
            .collect()
    }

    fn title(&self, node: NodeHandle) -> String {
        self.nodes.borrow()[node.raw()].title.clone()
    }

    fn node_id(&self, node: NodeHandle) -> Option<NodeId> {
        self.nodes.borrow()[node.raw()].id
    }

    fn ensure_id(&self, node: NodeHandle) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let record = &mut nodes[node.raw()];
        match record.id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                record.id = Some(id);
                id
            }
        }
    }

    fn has_tag(&self, node: NodeHandle, tag: &str) -> bool {
        self.nodes.borrow()[node.raw()].tags.contains(tag)
    }

    fn flag(&self, node: NodeHandle, name: &str) -> Option<FlagSource> {
        let nodes = self.nodes.borrow();
        if nodes[node.raw()].flags.contains(name) {
            return Some(FlagSource::Own);
        }
        let mut current = nodes[node.raw()].parent;
        while let Some(ancestor) = current {
            let record = &nodes[ancestor.raw()];
            if record.detached {
                return None;
            }
            if record.flags.contains(name) {
                return Some(FlagSource::Inherited);
            }
            current = record.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryOutline;
    use crate::model::node::FlagSource;
    use crate::outline::OutlineStore;

    #[test]
    fn children_keep_outline_order() {
        let outline = MemoryOutline::new();
        let root = outline.add_root("Root");
        let first = outline.add_child(root, "First");
        let second = outline.add_child(root, "Second");

        assert_eq!(outline.children(root), vec![first, second]);
        assert_eq!(outline.roots(), vec![root]);
    }

    #[test]
    fn ensure_id_is_lazy_and_stable() {
        let outline = MemoryOutline::new();
        let root = outline.add_root("Root");

        assert!(outline.node_id(root).is_none());
        let id = outline.ensure_id(root);
        assert_eq!(outline.node_id(root), Some(id));
        assert_eq!(outline.ensure_id(root), id);
    }

    #[test]
    fn flag_reports_own_before_inherited() {
        let outline = MemoryOutline::new();
        let root = outline.add_root("Root");
        let child = outline.add_child(root, "Child");
        let grandchild = outline.add_child(child, "Grandchild");

        assert_eq!(outline.flag(child, "pinned"), None);

        outline.set_flag(root, "pinned");
        assert_eq!(outline.flag(root, "pinned"), Some(FlagSource::Own));
        assert_eq!(outline.flag(child, "pinned"), Some(FlagSource::Inherited));
        assert_eq!(
            outline.flag(grandchild, "pinned"),
            Some(FlagSource::Inherited)
        );

        outline.set_flag(child, "pinned");
        assert_eq!(outline.flag(child, "pinned"), Some(FlagSource::Own));
    }

    #[test]
    fn detach_subtree_hides_all_descendants() {
        let outline = MemoryOutline::new();
        let root = outline.add_root("Root");
        let child = outline.add_child(root, "Child");
        let grandchild = outline.add_child(child, "Grandchild");

        outline.detach_subtree(child);

        assert!(outline.children(root).is_empty());
        assert!(outline.children(child).is_empty());
        assert!(outline.parent(grandchild).is_none());
        assert_eq!(outline.roots(), vec![root]);
    }

    #[test]
    fn tags_are_not_inherited() {
        let outline = MemoryOutline::new();
        let root = outline.add_root("Root");
        let child = outline.add_child(root, "Child");

        outline.add_tag(root, "attachments");
        assert!(outline.has_tag(root, "attachments"));
        assert!(!outline.has_tag(child, "attachments"));

        outline.remove_tag(root, "attachments");
        assert!(!outline.has_tag(root, "attachments"));
    }
}
