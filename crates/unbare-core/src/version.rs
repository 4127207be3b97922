//! Build identity reported by `unbare version`.

use serde::Serialize;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What `unbare version` prints: as one line, or as JSON with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Set when the build exported `UNBARE_BUILD_GIT_HASH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
    pub os: &'static str,
    pub arch: &'static str,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: "unbare",
            version: VERSION,
            git_hash: option_env!("UNBARE_BUILD_GIT_HASH"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

/// `unbare <version> [(<git hash>)] <os>-<arch>`
impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(hash) = self.git_hash {
            write!(f, " ({hash})")?;
        }
        write!(f, " {}-{}", self.os, self.arch)
    }
}
