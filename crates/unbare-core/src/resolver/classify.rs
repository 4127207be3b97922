//! Specifier classification.
//!
//! Decides, without touching the filesystem, whether a specifier needs
//! package resolution at all.

use serde::Serialize;

/// Node.js built-in module names, sorted for binary search.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Kind of module specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierKind {
    /// `./x`, `../x`, or anything else starting with `.`
    Relative,
    /// `/x`, or a Windows drive / UNC path
    Absolute,
    /// A runtime built-in such as `path` or `node:fs`
    Builtin,
    /// Carries a URL scheme: `https://…`, `data:…`
    Url,
    /// A package name, optionally scoped, optionally with a subpath
    Bare,
}

impl SpecifierKind {
    /// Only bare specifiers go through package resolution.
    #[must_use]
    pub fn needs_resolution(&self) -> bool {
        matches!(self, Self::Bare)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Builtin => "builtin",
            Self::Url => "url",
            Self::Bare => "bare",
        }
    }
}

impl std::fmt::Display for SpecifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a specifier against the runtime built-ins.
#[must_use]
pub fn classify(spec: &str) -> SpecifierKind {
    classify_with(spec, &[])
}

/// Classify a specifier, also treating `extra_builtins` as built-ins.
#[must_use]
pub fn classify_with(spec: &str, extra_builtins: &[String]) -> SpecifierKind {
    if spec.starts_with('.') {
        return SpecifierKind::Relative;
    }
    if is_absolute_path(spec) {
        return SpecifierKind::Absolute;
    }
    if is_builtin(spec) || extra_builtins.iter().any(|name| name == spec) {
        return SpecifierKind::Builtin;
    }
    if has_url_scheme(spec) {
        return SpecifierKind::Url;
    }
    SpecifierKind::Bare
}

/// Check whether `spec` names a runtime built-in (`path`, `fs/promises`, `node:test`, …).
#[must_use]
pub fn is_builtin(spec: &str) -> bool {
    // Every node: module is built in, including ones with no bare alias
    if spec.starts_with("node:") {
        return true;
    }
    NODE_BUILTINS.binary_search(&spec).is_ok()
}

fn is_absolute_path(spec: &str) -> bool {
    if spec.starts_with('/') || spec.starts_with("\\\\") {
        return true;
    }

    // C:\ or C:/
    let bytes = spec.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// `scheme:` per RFC 3986, at least two characters so drive letters never match.
fn has_url_scheme(spec: &str) -> bool {
    let Some((scheme, _)) = spec.split_once(':') else {
        return false;
    };
    scheme.len() >= 2
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_sorted() {
        let mut sorted = NODE_BUILTINS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, NODE_BUILTINS);
    }

    #[test]
    fn test_relative_and_absolute() {
        assert_eq!(classify("./dep"), SpecifierKind::Relative);
        assert_eq!(classify("../lib/dep.js"), SpecifierKind::Relative);
        assert_eq!(classify("."), SpecifierKind::Relative);
        assert_eq!(classify("/src/App.js"), SpecifierKind::Absolute);
        assert_eq!(classify("C:\\project\\a.js"), SpecifierKind::Absolute);
        assert_eq!(classify("\\\\server\\share\\a.js"), SpecifierKind::Absolute);
    }

    #[test]
    fn test_builtins() {
        assert_eq!(classify("path"), SpecifierKind::Builtin);
        assert_eq!(classify("fs"), SpecifierKind::Builtin);
        assert_eq!(classify("fs/promises"), SpecifierKind::Builtin);
        assert_eq!(classify("node:fs"), SpecifierKind::Builtin);
        assert_eq!(classify("node:test"), SpecifierKind::Builtin);
        // Not a built-in without the node: prefix
        assert_eq!(classify("test"), SpecifierKind::Bare);
        assert_eq!(classify("fs/missing"), SpecifierKind::Bare);
    }

    #[test]
    fn test_extra_builtins() {
        let extra = vec!["electron".to_string()];
        assert_eq!(classify_with("electron", &extra), SpecifierKind::Builtin);
        assert_eq!(classify("electron"), SpecifierKind::Bare);
    }

    #[test]
    fn test_urls() {
        assert_eq!(classify("https://esm.sh/preact"), SpecifierKind::Url);
        assert_eq!(classify("data:text/javascript,export{}"), SpecifierKind::Url);
    }

    #[test]
    fn test_bare() {
        assert_eq!(classify("import-meta-resolve"), SpecifierKind::Bare);
        assert_eq!(classify("@scope/pkg/sub/file.js"), SpecifierKind::Bare);
        assert_eq!(classify("lodash/fp"), SpecifierKind::Bare);
        assert_eq!(classify("#internal"), SpecifierKind::Bare);
        assert!(classify("preact").needs_resolution());
        assert!(!classify("path").needs_resolution());
    }
}
