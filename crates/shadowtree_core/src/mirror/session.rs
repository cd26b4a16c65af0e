//! Per-call synchronization session.
//!
//! # Responsibility
//! - Bound recursion and duplicate work within one top-level
//!   synchronization call.
//!
//! # Invariants
//! - A node id is processed at most once per session.
//! - Sessions are ephemeral; nothing is persisted.

use crate::model::node::NodeId;
use std::collections::HashSet;

/// Visited-set guard scoped to one top-level synchronization call.
///
/// Ancestor materialization and child reconciliation recurse into each
/// other; the session caps that mutual recursion at one visit per node.
/// It deliberately carries no cross-call state and offers no protection
/// against parallel invocation (the model is single-threaded).
#[derive(Debug, Default)]
pub struct SyncSession {
    visited: HashSet<NodeId>,
}

impl SyncSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a node id as processed.
    ///
    /// Returns `true` on first visit; `false` means the node was already
    /// handled during this call and must be skipped.
    pub fn begin(&mut self, id: NodeId) -> bool {
        self.visited.insert(id)
    }

    /// Returns how many distinct nodes this session has processed.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::SyncSession;
    use uuid::Uuid;

    #[test]
    fn second_visit_of_same_id_is_rejected() {
        let mut session = SyncSession::new();
        let id = Uuid::new_v4();

        assert!(session.begin(id));
        assert!(!session.begin(id));
        assert_eq!(session.visited_count(), 1);
    }

    #[test]
    fn distinct_ids_are_tracked_independently() {
        let mut session = SyncSession::new();
        assert!(session.begin(Uuid::new_v4()));
        assert!(session.begin(Uuid::new_v4()));
        assert_eq!(session.visited_count(), 2);
    }
}
