//! Mirror use-case service.
//!
//! # Responsibility
//! - Provide the attachment-directory resolution capability that hosts
//!   call on user actions.
//! - Run mirror synchronization as a documented step of that
//!   resolution, never as a hidden interception.
//!
//! # Invariants
//! - Every top-level call runs under a fresh `SyncSession`.
//! - Resolution for inherited nodes returns the owning ancestor's
//!   physical directory.

use crate::attach::AttachmentStore;
use crate::config::MirrorConfig;
use crate::mirror::predicate::owning_node;
use crate::mirror::session::SyncSession;
use crate::mirror::sync::MirrorSynchronizer;
use crate::mirror::MirrorResult;
use crate::model::node::NodeHandle;
use crate::outline::OutlineStore;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Service facade over outline and attachment store collaborators.
///
/// The mirror tree is a cache: hosts may delete it wholesale and call
/// [`synchronize_roots`] to regenerate it without information loss.
///
/// [`synchronize_roots`]: MirrorService::synchronize_roots
pub struct MirrorService<'a, O: OutlineStore, A: AttachmentStore> {
    outline: &'a O,
    attachments: &'a A,
    config: MirrorConfig,
    mirror_root: PathBuf,
}

impl<'a, O: OutlineStore, A: AttachmentStore> MirrorService<'a, O, A> {
    /// Creates a service for an outline document living in
    /// `document_dir`, which doubles as the mirror root fallback.
    pub fn new(
        outline: &'a O,
        attachments: &'a A,
        config: MirrorConfig,
        document_dir: &Path,
    ) -> Self {
        let mirror_root = config.root_for(document_dir);
        Self {
            outline,
            attachments,
            config,
            mirror_root,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Returns the effective mirror root.
    pub fn mirror_root(&self) -> &Path {
        &self.mirror_root
    }

    /// Resolves a node's physical attachment directory, creating it on
    /// first access, and reconciles the mirror as a documented step of
    /// the resolution.
    ///
    /// Inherited nodes resolve to their owning ancestor's directory.
    pub fn attachment_dir(&self, node: NodeHandle) -> MirrorResult<PathBuf> {
        let started_at = Instant::now();
        info!("event=attach_dir module=mirror status=start");

        match self.attachment_dir_inner(node) {
            Ok(dir) => {
                info!(
                    "event=attach_dir module=mirror status=ok duration_ms={} dir={}",
                    started_at.elapsed().as_millis(),
                    dir.display()
                );
                Ok(dir)
            }
            Err(err) => {
                error!(
                    "event=attach_dir module=mirror status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Resolves a node's mirror entry path without side effects.
    ///
    /// With `exclude_data_suffix` unset, the data-symlink name is
    /// appended, giving the browsable path of the node's attachment
    /// data. `None` means the node has no entry (empty title or
    /// unmaterialized anchor).
    pub fn entry_path(
        &self,
        node: NodeHandle,
        exclude_data_suffix: bool,
    ) -> MirrorResult<Option<PathBuf>> {
        self.synchronizer().entry_path(node, exclude_data_suffix)
    }

    /// Reconciles one node's mirror subtree under a fresh session.
    ///
    /// Returns the number of distinct nodes processed.
    pub fn synchronize(&self, node: NodeHandle) -> MirrorResult<usize> {
        let mut session = SyncSession::new();
        self.synchronizer().synchronize(node, &mut session)?;
        Ok(session.visited_count())
    }

    /// Rebuilds the whole mirror by reconciling every parentless node
    /// under one session.
    ///
    /// Returns the number of distinct nodes processed.
    pub fn synchronize_roots(&self) -> MirrorResult<usize> {
        let started_at = Instant::now();
        info!("event=mirror_rebuild module=mirror status=start");

        let synchronizer = self.synchronizer();
        let mut session = SyncSession::new();
        for root in self.outline.roots() {
            if let Err(err) = synchronizer.synchronize(root, &mut session) {
                error!(
                    "event=mirror_rebuild module=mirror status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        }

        info!(
            "event=mirror_rebuild module=mirror status=ok duration_ms={} nodes={}",
            started_at.elapsed().as_millis(),
            session.visited_count()
        );
        Ok(session.visited_count())
    }

    fn attachment_dir_inner(&self, node: NodeHandle) -> MirrorResult<PathBuf> {
        let owner = owning_node(self.outline, node)?;
        let id = self.outline.ensure_id(owner);
        let dir = self.attachments.ensure_dir(id)?;

        let mut session = SyncSession::new();
        self.synchronizer().synchronize(owner, &mut session)?;
        Ok(dir)
    }

    fn synchronizer(&self) -> MirrorSynchronizer<'_, O, A> {
        MirrorSynchronizer::new(
            self.outline,
            self.attachments,
            &self.config,
            self.mirror_root.clone(),
        )
    }
}
