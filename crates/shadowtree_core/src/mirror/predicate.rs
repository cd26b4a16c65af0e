//! Attachment ownership predicates.
//!
//! # Responsibility
//! - Decide direct and transitive attachment ownership for outline nodes.
//! - Resolve inherited attachment directories to their owning node.
//!
//! # Invariants
//! - Predicates never mutate outline or filesystem state.
//! - The explicit attachment tag wins; directory inspection is the
//!   fallback signal.

use crate::attach::{AttachmentStore, ATTACHMENT_TAG, ATTACH_DIR_FLAG};
use crate::config::MirrorConfig;
use crate::mirror::{MirrorError, MirrorResult};
use crate::model::node::{FlagSource, NodeHandle};
use crate::outline::OutlineStore;

/// Returns whether the node's attachment directory is inherited from an
/// ancestor rather than owned directly.
pub fn attach_dir_inherited<O: OutlineStore>(outline: &O, node: NodeHandle) -> bool {
    matches!(
        outline.flag(node, ATTACH_DIR_FLAG),
        Some(FlagSource::Inherited)
    )
}

/// Returns whether the node directly owns attachment data.
///
/// A node with an inherited attachment directory never owns data
/// directly. Otherwise the explicit tag decides first; without a tag,
/// a non-empty existing physical directory decides. The configured
/// symlinks subdirectory does not count as payload; a node materialized
/// only to host its children's entries owns nothing.
pub fn has_own_attachment<O: OutlineStore, A: AttachmentStore>(
    outline: &O,
    attachments: &A,
    config: &MirrorConfig,
    node: NodeHandle,
) -> MirrorResult<bool> {
    if attach_dir_inherited(outline, node) {
        return Ok(false);
    }
    if outline.has_tag(node, ATTACHMENT_TAG) {
        return Ok(true);
    }
    let Some(id) = outline.node_id(node) else {
        return Ok(false);
    };
    let Some(dir) = attachments.existing_dir(id) else {
        return Ok(false);
    };
    let files = attachments.list_files(&dir)?;
    Ok(files.iter().any(|name| name != &config.symlinks_dir))
}

/// Returns whether the node or any descendant directly owns attachment
/// data. Decides whether an intermediate mirror entry should exist even
/// when the node itself owns nothing.
pub fn subtree_has_attachment<O: OutlineStore, A: AttachmentStore>(
    outline: &O,
    attachments: &A,
    config: &MirrorConfig,
    node: NodeHandle,
) -> MirrorResult<bool> {
    if has_own_attachment(outline, attachments, config, node)? {
        return Ok(true);
    }
    for child in outline.children(node) {
        if subtree_has_attachment(outline, attachments, config, child)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Resolves the nearest self-or-ancestor node that owns its attachment
/// directory directly.
///
/// An inherited chain that reaches a parentless node without finding an
/// owner is an outline inconsistency.
pub fn owning_node<O: OutlineStore>(outline: &O, node: NodeHandle) -> MirrorResult<NodeHandle> {
    let mut current = node;
    while attach_dir_inherited(outline, current) {
        current = outline
            .parent(current)
            .ok_or_else(|| MirrorError::MissingAncestor {
                title: outline.title(node),
            })?;
    }
    Ok(current)
}

/// Lists the children the mirror sees under a node.
///
/// Children with inherited attachment directories have no entries of
/// their own; their children surface in their place, recursively, so
/// that every carrier subtree anchors at the nearest owning node.
pub fn mirror_children<O: OutlineStore>(outline: &O, node: NodeHandle) -> Vec<NodeHandle> {
    let mut result = Vec::new();
    for child in outline.children(node) {
        if attach_dir_inherited(outline, child) {
            result.extend(mirror_children(outline, child));
        } else {
            result.push(child);
        }
    }
    result
}
