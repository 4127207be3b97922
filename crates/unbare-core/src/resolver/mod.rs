//! Bare specifier resolution.
//!
//! Turns a bare module specifier written in a file into a loader path under
//! the dependency store:
//!
//! 1. Classify the specifier (`classify`); only bare specifiers are resolved.
//! 2. Find the nearest dependency store above the importing file (`root`).
//! 3. Split the specifier into package name and subpath (`entry`).
//! 4. Read the package manifest (`manifest`) and pick its entry, consulting
//!    `exports` (`exports`), then `module`, `main`, and an index guess.
//!
//! Every step fails with a [`ResolveFailure`]; callers treat all failures
//! as "leave the specifier unchanged".

mod classify;
mod entry;
mod exports;
mod failure;
mod manifest;
mod root;

pub use classify::{classify, classify_with, is_builtin, SpecifierKind, NODE_BUILTINS};
pub use entry::{
    entry_candidates, resolve_entry, EntryCandidate, EntrySource, PackageReference, ResolvedEntry,
};
pub use exports::{resolve_exports_root, IMPORT_CONDITIONS};
pub use failure::ResolveFailure;
pub use manifest::{ManifestError, PackageManifest, MANIFEST_FILE};
pub use root::find_dependency_root;

use crate::config::RewriteOptions;
use crate::fs::FileSystem;
use serde::Serialize;
use std::path::Path;

/// Result of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The specifier is not bare and is used as written.
    Passthrough { kind: SpecifierKind },
    /// The specifier resolved to a loader path.
    Resolved { to: ResolvedEntry },
}

/// Resolve a bare specifier inside a known dependency store.
pub fn resolve_in_store(
    store: &Path,
    specifier: &str,
    options: &RewriteOptions,
    fs: &dyn FileSystem,
) -> Result<ResolvedEntry, ResolveFailure> {
    let reference =
        PackageReference::parse(specifier).ok_or_else(|| ResolveFailure::PackageNotFound {
            name: specifier.to_string(),
            store: store.to_path_buf(),
        })?;
    resolve_entry(store, &reference, options, fs)
}

/// Resolve `specifier` as written in `importer`.
///
/// Non-bare specifiers come back as [`Resolution::Passthrough`] without
/// touching the filesystem.
pub fn resolve_specifier(
    specifier: &str,
    importer: &Path,
    options: &RewriteOptions,
    fs: &dyn FileSystem,
) -> Result<Resolution, ResolveFailure> {
    let kind = classify_with(specifier, &options.builtins);
    if !kind.needs_resolution() {
        return Ok(Resolution::Passthrough { kind });
    }

    let store = find_dependency_root(importer, &options.store_dir, fs)?;
    let to = resolve_in_store(&store, specifier, options, fs)?;
    Ok(Resolution::Resolved { to })
}
