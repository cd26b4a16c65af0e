//! Core domain logic for Shadowtree.
//! This crate owns the mirror-synchronization invariants end to end.

pub mod attach;
pub mod config;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod outline;
pub mod service;

pub use attach::{
    AttachError, AttachmentStore, FsAttachmentStore, ATTACHMENT_TAG, ATTACH_DIR_FLAG,
};
pub use config::{
    ConfigError, MirrorConfig, CONFIG_FILE_NAME, DEFAULT_DATA_LINK, DEFAULT_SYMLINKS_DIR,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mirror::{sanitize_title, MirrorError, MirrorResult, MirrorSynchronizer, SyncSession};
pub use model::node::{FlagSource, NodeHandle, NodeId};
pub use outline::{MemoryOutline, OutlineStore};
pub use service::mirror_service::MirrorService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
