use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read a source file, replacing invalid UTF-8 with U+FFFD.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether [`write_if_changed`] touched the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    Unchanged,
}

/// Replace the contents of `path` with `contents` unless they are already equal.
///
/// The new contents go to a sibling temp file that is renamed over `path`,
/// so readers see either the old or the new file, never a partial one.
///
/// # Errors
/// Returns an error if the temp file cannot be written or renamed.
pub fn write_if_changed(path: &Path, contents: &str) -> io::Result<WriteResult> {
    if fs::read(path).is_ok_and(|existing| existing == contents.as_bytes()) {
        return Ok(WriteResult::Unchanged);
    }

    replace_with(path, |file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    })?;

    Ok(WriteResult::Written)
}

/// Fill a sibling temp file with `fill`, then rename it over `path`.
/// The temp file is removed on every failure path.
fn replace_with(path: &Path, fill: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<()> {
    let temp = temp_path_for(path);
    let filled = File::create(&temp).and_then(|mut file| fill(&mut file));
    if let Err(e) = filled {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp, path) {
        // Windows refuses to rename over an existing file
        if cfg!(windows) {
            fs::copy(&temp, path)?;
            let _ = fs::remove_file(&temp);
        } else {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
    }

    Ok(())
}

/// Temp file next to `path`, so the rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("source");
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    dir.join(format!(".{name}.unbare.{}", std::process::id()))
}
