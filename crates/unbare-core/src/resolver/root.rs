//! Dependency store discovery.

use super::failure::ResolveFailure;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

/// Find the nearest dependency store above `source_file`.
///
/// The directory containing `source_file` is canonicalized once (falling
/// back to the path as given when that fails) and its parents are walked
/// until one holds a `store_dir` subdirectory. Returns the store directory
/// itself (e.g. `/project/node_modules`).
///
/// Walking real parents means a file reached through a symlinked directory
/// is resolved from where it actually lives.
pub fn find_dependency_root(
    source_file: &Path,
    store_dir: &str,
    fs: &dyn FileSystem,
) -> Result<PathBuf, ResolveFailure> {
    let start = start_dir(source_file);
    let real_start = fs.canonicalize(&start).unwrap_or_else(|_| start.clone());

    // Each parent is strictly shorter, so the walk always ends at the root
    for dir in real_start.ancestors() {
        let store = dir.join(store_dir);
        if fs.is_dir(&store) {
            return Ok(store);
        }
    }

    Err(ResolveFailure::NoDependencyRoot {
        start,
        store: store_dir.to_string(),
    })
}

/// Directory the search starts from, made absolute against the process cwd.
fn start_dir(source_file: &Path) -> PathBuf {
    let parent = match source_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if parent.is_absolute() {
        parent
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&parent))
            .unwrap_or(parent)
    }
}
