//! Pure mirror path resolution.
//!
//! # Responsibility
//! - Compute where a node's mirror entry lives, without touching the
//!   filesystem beyond metadata queries.
//!
//! # Invariants
//! - Resolution performs zero filesystem mutation; materialization is
//!   the synchronizer's job, composed explicitly by the service layer.
//! - Inherited nodes resolve to their owning ancestor's entry.

use crate::attach::AttachmentStore;
use crate::config::MirrorConfig;
use crate::mirror::predicate::owning_node;
use crate::mirror::sanitize::sanitize_title;
use crate::mirror::MirrorResult;
use crate::model::node::NodeHandle;
use crate::outline::OutlineStore;
use std::path::{Path, PathBuf};

/// Resolves the mirror entry path for a node.
///
/// The entry is the symlink named after the sanitized title, living in
/// the mirror root for parentless nodes and in the owning anchor
/// ancestor's symlinks directory otherwise. With `exclude_data_suffix`
/// unset, the fixed data-symlink name is appended, yielding the path a
/// file manager user follows to reach the node's attachment data.
///
/// Returns `None` when the node cannot have an entry yet: its title
/// sanitizes to empty, or the anchor ancestor has not been materialized
/// (no id or no physical directory so far).
pub fn entry_path<O: OutlineStore, A: AttachmentStore>(
    outline: &O,
    attachments: &A,
    config: &MirrorConfig,
    mirror_root: &Path,
    node: NodeHandle,
    exclude_data_suffix: bool,
) -> MirrorResult<Option<PathBuf>> {
    // An inherited node has no entry of its own; its path is the owning
    // ancestor's path.
    let node = owning_node(outline, node)?;

    let Some(name) = sanitize_title(&outline.title(node)) else {
        return Ok(None);
    };
    let Some(anchor) = anchor_dir(outline, attachments, config, mirror_root, node)? else {
        return Ok(None);
    };

    let entry = anchor.join(name);
    Ok(Some(if exclude_data_suffix {
        entry
    } else {
        entry.join(&config.data_link)
    }))
}

/// Computes the directory a node's entry symlink lives in.
///
/// Parentless nodes anchor in the mirror root. Other nodes anchor in
/// the symlinks directory of the nearest non-inherited ancestor, which
/// must already have an id and a physical directory for a pure answer.
fn anchor_dir<O: OutlineStore, A: AttachmentStore>(
    outline: &O,
    attachments: &A,
    config: &MirrorConfig,
    mirror_root: &Path,
    node: NodeHandle,
) -> MirrorResult<Option<PathBuf>> {
    let Some(parent) = outline.parent(node) else {
        return Ok(Some(mirror_root.to_path_buf()));
    };
    let anchor = owning_node(outline, parent)?;
    let Some(id) = outline.node_id(anchor) else {
        return Ok(None);
    };
    let Some(dir) = attachments.existing_dir(id) else {
        return Ok(None);
    };
    Ok(Some(dir.join(&config.symlinks_dir)))
}
