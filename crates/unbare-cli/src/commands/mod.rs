pub mod resolve;
pub mod rewrite;
pub mod version;

use std::path::{Path, PathBuf};

/// Resolve a command-line path against the working directory.
pub(crate) fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
