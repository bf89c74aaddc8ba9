//! Filesystem Reset Primitive

use std::io;
use std::path::Path;

/// Deletes paths on behalf of reset steps
pub trait Filesystem {
    /// Recursively remove `path`. A missing path is not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// Deletes from the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFilesystem;

impl Filesystem for SystemFilesystem {
    fn remove_all(&self, path: &Path) -> io::Result<()> {
        remove_path(path)
    }
}

/// Remove a file, symlink or directory tree; absent paths are a no-op.
///
/// Symlinks are unlinked, never followed.
pub fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
