//! Package entry resolution.
//!
//! Given a dependency store and a bare specifier, finds the file a loader
//! should fetch:
//! - a subpath request (`pkg/lib/util.js`) names a file inside the package
//!   directly and bypasses manifest entry fields;
//! - a package-root request (`pkg`) is resolved by an ordered list of entry
//!   rules (`exports`, `module`, `main`, `index` guess), taking the first
//!   candidate that exists on disk.

use super::exports::resolve_exports_root;
use super::failure::ResolveFailure;
use super::manifest::{PackageManifest, MANIFEST_FILE};
use crate::config::RewriteOptions;
use crate::fs::FileSystem;
use serde::Serialize;
use std::path::Path;

/// A bare specifier split into package name and subpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    /// `lodash`, or `@scope/name` for scoped packages.
    pub name: String,
    /// Everything after the package name, without the leading slash. May be empty.
    pub subpath: String,
}

impl PackageReference {
    /// Split a bare specifier.
    ///
    /// Returns `None` for specifiers with no package name (`""`, `"@scope"`, `"/x"`).
    ///
    /// - `lodash` → (`lodash`, ``)
    /// - `lodash/fp` → (`lodash`, `fp`)
    /// - `@scope/pkg/sub/file.js` → (`@scope/pkg`, `sub/file.js`)
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        let split_at = if spec.starts_with('@') {
            // Scoped: the name spans the first two segments
            let scope_end = spec.find('/')?;
            spec[scope_end + 1..]
                .find('/')
                .map(|i| scope_end + 1 + i)
        } else {
            spec.find('/')
        };

        let (name, subpath) = match split_at {
            Some(i) => (&spec[..i], &spec[i + 1..]),
            None => (spec, ""),
        };

        if name.is_empty() || name.ends_with('/') || (name.starts_with('@') && name.len() < 3) {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            subpath: subpath.to_string(),
        })
    }

    /// Whether the specifier asks for a specific file inside the package.
    #[must_use]
    pub fn has_subpath(&self) -> bool {
        !self.subpath.is_empty()
    }

    /// The specifier this reference was parsed from.
    #[must_use]
    pub fn specifier(&self) -> String {
        if self.has_subpath() {
            format!("{}/{}", self.name, self.subpath)
        } else {
            self.name.clone()
        }
    }
}

/// A loader path for a resolved package entry, e.g.
/// `/node_modules/escalade/dist/index.mjs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedEntry(String);

impl ResolvedEntry {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ResolvedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Manifest field (or fallback) that produced an entry candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Exports,
    Module,
    Main,
    Index,
}

impl EntrySource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exports => "exports",
            Self::Module => "module",
            Self::Main => "main",
            Self::Index => "index",
        }
    }
}

/// A package-relative path to probe, with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCandidate {
    pub source: EntrySource,
    /// Normalized, forward-slash, package-relative path.
    pub path: String,
}

type EntryRule = fn(&PackageManifest, &RewriteOptions) -> Vec<String>;

/// Entry rules in priority order. A rule producing no candidates is skipped.
const ENTRY_RULES: &[(EntrySource, EntryRule)] = &[
    (EntrySource::Exports, exports_rule),
    (EntrySource::Module, module_rule),
    (EntrySource::Main, main_rule),
    (EntrySource::Index, index_rule),
];

fn exports_rule(manifest: &PackageManifest, _options: &RewriteOptions) -> Vec<String> {
    // Export targets are exact paths; no extension probing
    manifest
        .exports
        .as_ref()
        .and_then(resolve_exports_root)
        .into_iter()
        .collect()
}

fn module_rule(manifest: &PackageManifest, options: &RewriteOptions) -> Vec<String> {
    manifest
        .module
        .as_deref()
        .map(|module| probe_paths(module, options))
        .unwrap_or_default()
}

fn main_rule(manifest: &PackageManifest, options: &RewriteOptions) -> Vec<String> {
    manifest
        .main
        .as_deref()
        .map(|main| probe_paths(main, options))
        .unwrap_or_default()
}

fn index_rule(_manifest: &PackageManifest, options: &RewriteOptions) -> Vec<String> {
    options
        .extensions
        .iter()
        .map(|ext| format!("index{ext}"))
        .collect()
}

/// Legacy field probing: the path as written, then with each extension,
/// then as a directory holding `index.<ext>`.
fn probe_paths(field: &str, options: &RewriteOptions) -> Vec<String> {
    let base = field.trim_end_matches('/');
    let mut paths = vec![base.to_string()];
    paths.extend(options.extensions.iter().map(|ext| format!("{base}{ext}")));
    paths.extend(
        options
            .extensions
            .iter()
            .map(|ext| format!("{base}/index{ext}")),
    );
    paths
}

/// List every root entry candidate for a manifest, highest priority first.
///
/// Candidates that would escape the package directory are dropped.
#[must_use]
pub fn entry_candidates(manifest: &PackageManifest, options: &RewriteOptions) -> Vec<EntryCandidate> {
    ENTRY_RULES
        .iter()
        .flat_map(|(source, rule)| {
            rule(manifest, options)
                .into_iter()
                .filter_map(|path| normalize_relative(&path))
                .map(|path| EntryCandidate {
                    source: *source,
                    path,
                })
        })
        .collect()
}

/// Resolve a package reference against a dependency store directory.
pub fn resolve_entry(
    store: &Path,
    reference: &PackageReference,
    options: &RewriteOptions,
    fs: &dyn FileSystem,
) -> Result<ResolvedEntry, ResolveFailure> {
    let pkg_dir = store.join(&reference.name);
    let manifest_path = pkg_dir.join(MANIFEST_FILE);

    if !fs.is_dir(&pkg_dir) || !fs.is_file(&manifest_path) {
        return Err(ResolveFailure::PackageNotFound {
            name: reference.name.clone(),
            store: store.to_path_buf(),
        });
    }

    let unreadable = |reason: String| ResolveFailure::UnreadableManifest {
        path: manifest_path.clone(),
        reason,
    };
    let text = fs
        .read_to_string(&manifest_path)
        .map_err(|e| unreadable(e.to_string()))?;
    let manifest = PackageManifest::parse(&text).map_err(|e| unreadable(e.to_string()))?;

    let no_entry = || ResolveFailure::NoResolvableEntry {
        name: reference.name.clone(),
        request: reference.specifier(),
    };

    let relative = if reference.has_subpath() {
        // Subpath requests name a file directly
        let path = normalize_relative(&reference.subpath).ok_or_else(no_entry)?;
        if !fs.is_file(&pkg_dir.join(&path)) {
            return Err(no_entry());
        }
        path
    } else {
        entry_candidates(&manifest, options)
            .into_iter()
            .find(|candidate| fs.is_file(&pkg_dir.join(&candidate.path)))
            .map(|candidate| candidate.path)
            .ok_or_else(no_entry)?
    };

    Ok(ResolvedEntry(options.entry_url(&reference.name, &relative)))
}

/// Normalize a package-relative path to forward slashes with no `.` segments.
///
/// Returns `None` for empty paths, absolute paths, and paths containing `..`.
fn normalize_relative(path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        return None;
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
