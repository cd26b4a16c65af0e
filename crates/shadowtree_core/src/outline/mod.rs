//! Outline store contract and implementations.
//!
//! # Responsibility
//! - Define the read/identity contract the mirror core consumes.
//! - Keep outline storage and parsing details outside the core.
//!
//! # Invariants
//! - `ensure_id` allocates at most one id per node and returns it stably
//!   afterwards.
//! - Child listing preserves outline order (significant for display, not
//!   for mirror correctness).
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::node::{FlagSource, NodeHandle, NodeId};

pub mod memory;

pub use memory::MemoryOutline;

/// Read and identity contract over a hierarchical document outline.
///
/// The mirror core never mutates outline structure through this trait;
/// the only write it performs is lazy id allocation via [`ensure_id`],
/// which is the point at which a node first becomes addressable in
/// attachment storage.
///
/// [`ensure_id`]: OutlineStore::ensure_id
pub trait OutlineStore {
    /// Returns the parent handle, or `None` for a parentless node.
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Returns child handles in outline order.
    fn children(&self, node: NodeHandle) -> Vec<NodeHandle>;

    /// Returns handles of all parentless nodes in outline order.
    fn roots(&self) -> Vec<NodeHandle>;

    /// Returns the node's display title.
    fn title(&self, node: NodeHandle) -> String;

    /// Returns the node's stable id without allocating one.
    fn node_id(&self, node: NodeHandle) -> Option<NodeId>;

    /// Returns the node's stable id, allocating it on first call.
    fn ensure_id(&self, node: NodeHandle) -> NodeId;

    /// Returns whether the node carries a non-inheritable marker tag.
    fn has_tag(&self, node: NodeHandle, tag: &str) -> bool;

    /// Looks up a named inheritable boolean property.
    ///
    /// Returns `Some(FlagSource::Own)` when set on the node itself,
    /// `Some(FlagSource::Inherited)` when only an ancestor sets it, and
    /// `None` when no node on the ancestor chain sets it.
    fn flag(&self, node: NodeHandle, name: &str) -> Option<FlagSource>;
}
