//! Resolution-local failures.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a bare specifier could not be turned into a loader path.
///
/// Every variant is handled the same way by the rewriter: the specifier is
/// left as written.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolveFailure {
    /// No dependency store above the importing file.
    #[error("no {store} directory found above {}", start.display())]
    NoDependencyRoot { start: PathBuf, store: String },

    /// The package directory or its manifest is missing.
    #[error("package '{name}' not found in {}", store.display())]
    PackageNotFound { name: String, store: PathBuf },

    /// The manifest was read but no candidate entry file exists.
    #[error("package '{name}' has no resolvable entry for '{request}'")]
    NoResolvableEntry { name: String, request: String },

    /// The manifest could not be read or is not a JSON object.
    #[error("unreadable manifest {}: {reason}", path.display())]
    UnreadableManifest { path: PathBuf, reason: String },
}

impl ResolveFailure {
    /// Stable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDependencyRoot { .. } => "NO_DEPENDENCY_ROOT",
            Self::PackageNotFound { .. } => "PACKAGE_NOT_FOUND",
            Self::NoResolvableEntry { .. } => "NO_RESOLVABLE_ENTRY",
            Self::UnreadableManifest { .. } => "UNREADABLE_MANIFEST",
        }
    }
}
