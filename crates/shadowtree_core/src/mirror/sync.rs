//! Mirror synchronization algorithm.
//!
//! # Responsibility
//! - Reconcile one node's mirror subtree against live outline state.
//! - Materialize ancestor mirror entries lazily while staying bounded by
//!   the session's visited set.
//!
//! # Invariants
//! - Every step is independently idempotent; re-running over unchanged
//!   state performs zero filesystem mutations.
//! - Pruning only ever deletes entries recognized as symlinks.
//! - A node id is processed at most once per session.
//!
//! # See also
//! - docs/architecture/mirror-sync.md

use crate::attach::AttachmentStore;
use crate::config::MirrorConfig;
use crate::mirror::predicate::{
    attach_dir_inherited, has_own_attachment, mirror_children, owning_node, subtree_has_attachment,
};
use crate::mirror::sanitize::sanitize_title;
use crate::mirror::session::SyncSession;
use crate::mirror::{fsops, resolve, MirrorError, MirrorResult};
use crate::model::node::NodeHandle;
use crate::outline::OutlineStore;
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Stateless reconciler for the symlink mirror tree.
///
/// Holds only borrowed collaborators; all mirror state is recomputed
/// from the outline and the filesystem on every call. Synchronization is
/// hooked into attachment-directory resolution by the service layer, not
/// run as a standalone batch job.
pub struct MirrorSynchronizer<'a, O: OutlineStore, A: AttachmentStore> {
    outline: &'a O,
    attachments: &'a A,
    config: &'a MirrorConfig,
    mirror_root: PathBuf,
}

impl<'a, O: OutlineStore, A: AttachmentStore> MirrorSynchronizer<'a, O, A> {
    /// Creates a synchronizer writing into `mirror_root`.
    pub fn new(
        outline: &'a O,
        attachments: &'a A,
        config: &'a MirrorConfig,
        mirror_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            outline,
            attachments,
            config,
            mirror_root: mirror_root.into(),
        }
    }

    /// Returns the mirror root directory.
    pub fn mirror_root(&self) -> &Path {
        &self.mirror_root
    }

    /// Resolves a node's mirror entry path without side effects.
    pub fn entry_path(
        &self,
        node: NodeHandle,
        exclude_data_suffix: bool,
    ) -> MirrorResult<Option<PathBuf>> {
        resolve::entry_path(
            self.outline,
            self.attachments,
            self.config,
            &self.mirror_root,
            node,
            exclude_data_suffix,
        )
    }

    /// Reconciles one node's mirror subtree against live outline state.
    ///
    /// Ensures the node's symlinks directory, its data symlink, its
    /// registration in the anchor directory, and its children's
    /// entries: child subtrees holding at least one attachment carrier
    /// are synchronized recursively, every other child entry is pruned.
    /// Recurses into ancestors to materialize their mirror entries on
    /// demand; the session's visited set bounds the mutual recursion.
    ///
    /// Nodes with inherited attachment directories are skipped entirely;
    /// only their owning ancestor is synchronized.
    pub fn synchronize(&self, node: NodeHandle, session: &mut SyncSession) -> MirrorResult<()> {
        let id = self.outline.ensure_id(node);
        if !session.begin(id) {
            return Ok(());
        }
        if attach_dir_inherited(self.outline, node) {
            debug!("event=mirror_sync module=mirror status=skip reason=inherited node_id={id}");
            return Ok(());
        }

        // 1. Materialize the symlinks directory.
        let attach_dir = self.attachments.ensure_dir(id)?;
        let links_dir = attach_dir.join(&self.config.symlinks_dir);
        fsops::ensure_dir(&links_dir)?;

        // 2. Reconcile the data symlink.
        let owns = has_own_attachment(self.outline, self.attachments, self.config, node)?;
        self.reconcile_data_link(&links_dir, &attach_dir, owns)?;

        // 3. Register the entry with the anchor directory.
        if let Some(name) = sanitize_title(&self.outline.title(node)) {
            let anchor = self.materialize_anchor(node, session)?;
            fsops::ensure_symlink(&anchor.join(&name), &links_dir)?;
        }

        // 4. Prune stale children and recurse into carrier subtrees.
        self.reconcile_children(node, &links_dir, session)?;

        Ok(())
    }

    /// Ensures the directory the node's entry symlink lives in exists,
    /// synchronizing the anchor ancestor first when there is one.
    fn materialize_anchor(
        &self,
        node: NodeHandle,
        session: &mut SyncSession,
    ) -> MirrorResult<PathBuf> {
        match self.outline.parent(node) {
            None => {
                fsops::ensure_dir(&self.mirror_root)?;
                Ok(self.mirror_root.clone())
            }
            Some(parent) => {
                let anchor = owning_node(self.outline, parent)?;
                self.synchronize(anchor, session)?;
                let dir = self.attachments.ensure_dir(self.outline.ensure_id(anchor))?;
                Ok(dir.join(&self.config.symlinks_dir))
            }
        }
    }

    fn reconcile_data_link(
        &self,
        links_dir: &Path,
        attach_dir: &Path,
        owns: bool,
    ) -> MirrorResult<()> {
        let data_link = links_dir.join(&self.config.data_link);
        match fs::symlink_metadata(&data_link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                if owns {
                    fsops::ensure_symlink(&data_link, attach_dir)
                } else {
                    debug!(
                        "event=mirror_sync module=mirror status=prune entry=data path={}",
                        data_link.display()
                    );
                    fsops::remove_symlink(&data_link)
                }
            }
            Ok(_) => Err(MirrorError::NamingCollision {
                path: data_link,
                expected: "a symlink",
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if owns {
                    fsops::ensure_symlink(&data_link, attach_dir)
                } else {
                    Ok(())
                }
            }
            Err(source) => Err(MirrorError::Io {
                path: data_link,
                source,
            }),
        }
    }

    /// Reconciles child entries inside the node's symlinks directory.
    ///
    /// Children with inherited directories pass through to their own
    /// children, so every carrier subtree anchors at the nearest owning
    /// node. Afterwards every unclaimed entry that is a symlink is
    /// deleted; anything else is left alone.
    fn reconcile_children(
        &self,
        node: NodeHandle,
        links_dir: &Path,
        session: &mut SyncSession,
    ) -> MirrorResult<()> {
        let mut existing = self.list_entries(links_dir)?;
        existing.remove(&self.config.data_link);

        for child in mirror_children(self.outline, node) {
            let Some(name) = sanitize_title(&self.outline.title(child)) else {
                continue;
            };
            if !subtree_has_attachment(self.outline, self.attachments, self.config, child)? {
                continue;
            }
            self.synchronize(child, session)?;
            existing.remove(&name);
        }

        for (name, path) in existing {
            if fsops::is_symlink(&path) {
                debug!(
                    "event=mirror_sync module=mirror status=prune entry={name} path={}",
                    path.display()
                );
                fsops::remove_symlink(&path)?;
            }
        }
        Ok(())
    }

    fn list_entries(&self, links_dir: &Path) -> MirrorResult<BTreeMap<String, PathBuf>> {
        let entries = fs::read_dir(links_dir).map_err(|source| MirrorError::Io {
            path: links_dir.to_path_buf(),
            source,
        })?;

        let mut result = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| MirrorError::Io {
                path: links_dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            result.insert(name, entry.path());
        }
        Ok(result)
    }
}
