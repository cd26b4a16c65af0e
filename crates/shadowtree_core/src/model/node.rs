//! Node identity model.
//!
//! # Responsibility
//! - Provide the opaque store-issued handle for addressing outline nodes.
//! - Provide the stable identifier type used to key attachment storage.
//!
//! # Invariants
//! - `NodeId` is stable and never reassigned once allocated.
//! - A node may exist without a `NodeId`; ids are created lazily on first
//!   attachment access.

use uuid::Uuid;

/// Stable identifier keying a node's physical attachment directory.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = Uuid;

/// Opaque handle addressing one node inside an [`crate::outline::OutlineStore`].
///
/// Handles are issued by the store and remain valid for the store's
/// lifetime. Unlike [`NodeId`], a handle exists for every node, including
/// nodes that never touched attachment storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    /// Wraps a raw store index. Intended for `OutlineStore` implementors.
    pub fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw store index backing this handle.
    pub fn raw(self) -> usize {
        self.0
    }
}

/// Origin of an inheritable boolean node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSource {
    /// The property is set on the node itself.
    Own,
    /// The property is only set on an ancestor.
    Inherited,
}

#[cfg(test)]
mod tests {
    use super::{FlagSource, NodeHandle};

    #[test]
    fn handle_round_trips_raw_index() {
        let handle = NodeHandle::from_raw(7);
        assert_eq!(handle.raw(), 7);
    }

    #[test]
    fn flag_source_distinguishes_own_from_inherited() {
        assert_ne!(FlagSource::Own, FlagSource::Inherited);
    }
}
