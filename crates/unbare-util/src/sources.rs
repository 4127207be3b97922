//! Source file discovery.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions of files that may carry import declarations.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "jsx", "ts", "tsx", "mts"];

/// Expand files and directories into a sorted, deduplicated list of source files.
///
/// Directories are walked recursively, skipping hidden directories and any
/// directory named `store_dir`. Paths given explicitly are kept as long as
/// they are files, whatever their extension.
#[must_use]
pub fn collect_sources(paths: &[PathBuf], store_dir: &str) -> Vec<PathBuf> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e, store_dir))
            .filter_map(Result::ok)
        {
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                sources.push(entry.into_path());
            }
        }
    }

    sources.sort();
    sources.dedup();
    sources
}

/// Check if a path has one of [`SOURCE_EXTENSIONS`] (case-insensitive).
#[must_use]
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn is_skipped_dir(entry: &DirEntry, store_dir: &str) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name();
    name == OsStr::new(store_dir) || name.to_str().is_some_and(|n| n.starts_with('.'))
}
