//! Filesystem primitives shared by the synchronizer.
//!
//! # Responsibility
//! - Provide idempotent directory/symlink operations.
//! - Centralize naming-collision detection.
//!
//! # Invariants
//! - A conflicting non-symlink occupant is reported, never overwritten.
//! - Removal helpers only ever delete objects recognized as symlinks.

use crate::mirror::{MirrorError, MirrorResult};
use std::fs;
use std::io;
use std::os::unix::fs as unix_fs;
use std::path::Path;

/// Returns whether `path` is a symlink (without following it).
pub(crate) fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

/// Ensures a real directory exists at `path`.
///
/// A symlink or regular file occupying the path is a naming collision;
/// symlinks do not count as directories here even when they point at one.
pub(crate) fn ensure_dir(path: &Path) -> MirrorResult<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_dir() => Ok(()),
        Ok(_) => Err(MirrorError::NamingCollision {
            path: path.to_path_buf(),
            expected: "a real directory",
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|source| MirrorError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(MirrorError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Ensures a symlink at `link` pointing at `target`.
///
/// An existing symlink with the right target is left untouched. A
/// symlink with a stale target is retargeted (symlinks are mirror-owned
/// cache entries). Any non-symlink occupant is a naming collision.
pub(crate) fn ensure_symlink(link: &Path, target: &Path) -> MirrorResult<()> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let current = fs::read_link(link).map_err(|source| MirrorError::Io {
                path: link.to_path_buf(),
                source,
            })?;
            if current == target {
                return Ok(());
            }
            remove_symlink(link)?;
            create_symlink(link, target)
        }
        Ok(_) => Err(MirrorError::NamingCollision {
            path: link.to_path_buf(),
            expected: "a symlink",
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => create_symlink(link, target),
        Err(source) => Err(MirrorError::Io {
            path: link.to_path_buf(),
            source,
        }),
    }
}

/// Removes the symlink at `path`.
pub(crate) fn remove_symlink(path: &Path) -> MirrorResult<()> {
    fs::remove_file(path).map_err(|source| MirrorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_symlink(link: &Path, target: &Path) -> MirrorResult<()> {
    unix_fs::symlink(target, link).map_err(|source| MirrorError::Io {
        path: link.to_path_buf(),
        source,
    })
}
