//! Filesystem access used during resolution.
//!
//! The resolver only needs existence checks, whole-file reads and
//! canonicalization, so it goes through this narrow trait instead of
//! `std::fs` directly.

use std::io;
use std::path::{Path, PathBuf};

/// Read-only filesystem operations consumed by the resolver.
///
/// Implementations must be thread-safe (Send + Sync) so independent rewrites
/// can share one instance.
pub trait FileSystem: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Resolve symlinks and relative components.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // dunce keeps Windows paths free of the \\?\ prefix
        dunce::canonicalize(path)
    }
}
