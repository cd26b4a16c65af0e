//! Identifier-keyed attachment storage.
//!
//! # Responsibility
//! - Resolve and create physical attachment directories by stable id.
//! - List attachment payload while hiding bookkeeping files.
//!
//! # Invariants
//! - `existing_dir` never touches the filesystem beyond a metadata query.
//! - `list_files` excludes the fixed bookkeeping set, nothing else.

use crate::model::node::NodeId;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory-local variable declarations dropped by editors.
pub const LOCAL_VARIABLES_FILE: &str = ".localvars";

/// Generated lint-cache artifact.
pub const LINT_CACHE_FILE: &str = ".lintcache";

/// Entries that never count as attachment payload.
const BOOKKEEPING_FILES: &[&str] = &[LOCAL_VARIABLES_FILE, LINT_CACHE_FILE];

/// Result type used by attachment store operations.
pub type AttachResult<T> = Result<T, AttachError>;

/// Errors from attachment store operations.
#[derive(Debug)]
pub enum AttachError {
    /// Filesystem failure while touching attachment storage.
    Io { path: PathBuf, source: io::Error },
}

impl Display for AttachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "attachment storage error at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for AttachError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Storage contract for physical attachment directories.
///
/// The mirror core distinguishes the pure lookup (`existing_dir`) from
/// the creating lookup (`ensure_dir`) so that predicates can stay free of
/// side effects.
pub trait AttachmentStore {
    /// Returns the node's physical directory when it already exists.
    fn existing_dir(&self, id: NodeId) -> Option<PathBuf>;

    /// Returns the node's physical directory, creating it on demand.
    fn ensure_dir(&self, id: NodeId) -> AttachResult<PathBuf>;

    /// Lists payload entries of a physical directory.
    ///
    /// Bookkeeping files are excluded; everything else, including
    /// subdirectories, counts as payload.
    fn list_files(&self, dir: &Path) -> AttachResult<BTreeSet<String>>;
}

/// Flat, identifier-keyed attachment store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    /// Creates a store rooted at `root`. The root itself is created
    /// lazily by the first `ensure_dir` call.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, id: NodeId) -> PathBuf {
        self.root.join(id.to_string())
    }
}

impl AttachmentStore for FsAttachmentStore {
    fn existing_dir(&self, id: NodeId) -> Option<PathBuf> {
        let dir = self.dir_for(id);
        dir.is_dir().then_some(dir)
    }

    fn ensure_dir(&self, id: NodeId) -> AttachResult<PathBuf> {
        let dir = self.dir_for(id);
        fs::create_dir_all(&dir).map_err(|source| AttachError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    fn list_files(&self, dir: &Path) -> AttachResult<BTreeSet<String>> {
        let entries = fs::read_dir(dir).map_err(|source| AttachError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|source| AttachError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if BOOKKEEPING_FILES.contains(&name.as_str()) {
                continue;
            }
            names.insert(name);
        }
        Ok(names)
    }
}
