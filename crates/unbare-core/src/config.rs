use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "unbare.json";

/// Options controlling how bare specifiers are resolved and rewritten.
///
/// Deserialized from `unbare.json`; every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteOptions {
    /// Dependency store directory name searched for upward from the importing file.
    pub store_dir: String,

    /// Virtual root prepended to `<package>/<entry>` in rewritten specifiers.
    pub url_prefix: String,

    /// Extensions probed (in order) when a `main`/`module` field or index
    /// guess names a file without one.
    pub extensions: Vec<String>,

    /// Extra module names passed through unchanged, on top of the runtime built-ins.
    pub builtins: Vec<String>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            store_dir: "node_modules".to_string(),
            url_prefix: "/node_modules/".to_string(),
            extensions: vec![".js".to_string(), ".mjs".to_string(), ".cjs".to_string()],
            builtins: Vec::new(),
        }
    }
}

impl RewriteOptions {
    /// Set the dependency store directory name.
    #[must_use]
    pub fn with_store_dir(mut self, store_dir: impl Into<String>) -> Self {
        self.store_dir = store_dir.into();
        self
    }

    /// Set the virtual root marker.
    #[must_use]
    pub fn with_url_prefix(mut self, url_prefix: impl Into<String>) -> Self {
        self.url_prefix = url_prefix.into();
        self
    }

    /// Add a module name to pass through unchanged.
    #[must_use]
    pub fn with_builtin(mut self, name: impl Into<String>) -> Self {
        self.builtins.push(name.into());
        self
    }

    /// Build the loader path for a package entry: `<prefix><package>/<entry>`.
    ///
    /// The prefix always ends up with exactly one separating slash.
    #[must_use]
    pub fn entry_url(&self, package: &str, entry: &str) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        format!("{prefix}/{package}/{entry}")
    }
}

/// Runtime configuration for the unbare CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Resolution and rewrite options.
    pub rewrite: RewriteOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            rewrite: RewriteOptions::default(),
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Create a config for `cwd`, reading rewrite options from `unbare.json`
    /// when that file exists.
    pub fn load(cwd: PathBuf) -> Result<Self, Error> {
        let rewrite = load_rewrite_options(&cwd)?.unwrap_or_default();
        Ok(Self::new(cwd).with_rewrite_options(rewrite))
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Replace the rewrite options.
    #[must_use]
    pub fn with_rewrite_options(mut self, rewrite: RewriteOptions) -> Self {
        self.rewrite = rewrite;
        self
    }
}

/// Read `unbare.json` from `dir`. Returns `Ok(None)` when there is no such file.
pub fn load_rewrite_options(dir: &Path) -> Result<Option<RewriteOptions>, Error> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let options =
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse { path, source })?;

    Ok(Some(options))
}
