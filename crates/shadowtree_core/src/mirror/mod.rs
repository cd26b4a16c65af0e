//! Mirror tree core: sanitation, predicates, path resolution and the
//! synchronization algorithm.
//!
//! # Responsibility
//! - Reconcile the symlink mirror tree against live outline state.
//! - Keep every reconciliation step idempotent and collision-safe.
//!
//! # Invariants
//! - The mirror tree is fully derivable from outline structure plus
//!   attachment ownership; it carries no independent state.
//! - Reconciliation never overwrites a filesystem object it does not
//!   recognize as its own symlink.
//!
//! # See also
//! - docs/architecture/mirror-sync.md

use crate::attach::AttachError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod fsops;
pub mod predicate;
pub mod resolve;
pub mod sanitize;
pub mod session;
pub mod sync;

pub use sanitize::sanitize_title;
pub use session::SyncSession;
pub use sync::MirrorSynchronizer;

/// Result type used by mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors from mirror path resolution and synchronization.
#[derive(Debug)]
pub enum MirrorError {
    /// A required path is occupied by an incompatible filesystem object.
    ///
    /// Fatal for the current call; the occupant is never overwritten.
    NamingCollision {
        path: PathBuf,
        expected: &'static str,
    },
    /// A node inherits its attachment directory but the ancestor chain
    /// holds no owner. Outline inconsistency, reported not defaulted.
    MissingAncestor { title: String },
    /// Attachment store failure.
    Attach(AttachError),
    /// Filesystem failure while touching the mirror tree.
    Io { path: PathBuf, source: io::Error },
}

impl Display for MirrorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NamingCollision { path, expected } => write!(
                f,
                "path `{}` is occupied by a conflicting entry, expected {expected}",
                path.display()
            ),
            Self::MissingAncestor { title } => write!(
                f,
                "node `{title}` inherits its attachment directory but has no owning ancestor"
            ),
            Self::Attach(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "mirror filesystem error at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NamingCollision { .. } => None,
            Self::MissingAncestor { .. } => None,
            Self::Attach(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<AttachError> for MirrorError {
    fn from(value: AttachError) -> Self {
        Self::Attach(value)
    }
}
