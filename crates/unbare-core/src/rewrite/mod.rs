//! Bare specifier rewriting.
//!
//! Scans source text for static import/export-from declarations, resolves
//! every bare specifier to a loader path under the dependency store and
//! splices the result into the specifier's span. Everything outside those
//! spans is copied byte-for-byte.
//!
//! Resolution failures never abort a rewrite: the affected specifier is left
//! as written and the failure is recorded in the per-declaration report.

mod edits;

pub use edits::{Edit, EditList};

use crate::config::RewriteOptions;
use crate::error::Error;
use crate::fs::{FileSystem, OsFileSystem};
use crate::imports::{scan_declarations, DeclarationKind, Span};
use crate::resolver::{
    classify_with, find_dependency_root, resolve_in_store, ResolveFailure, ResolvedEntry,
    SpecifierKind,
};
use serde::Serialize;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// What happened to one declaration's specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Not bare; used as written.
    Unchanged { kind: SpecifierKind },
    /// Bare and resolved; the span now holds `to`.
    Rewritten { to: ResolvedEntry },
    /// Bare but unresolvable; left as written.
    Failed { reason: ResolveFailure },
}

/// Report for a single declaration, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecifierReport {
    pub specifier: String,
    /// Span of the specifier in the input text.
    pub span: Span,
    pub line: u32,
    pub kind: DeclarationKind,
    pub outcome: Outcome,
}

/// Rewritten text plus what happened to each declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOutput {
    pub code: String,
    pub specifiers: Vec<SpecifierReport>,
}

impl RewriteOutput {
    /// Number of specifiers that were replaced.
    #[must_use]
    pub fn rewritten_count(&self) -> usize {
        self.specifiers
            .iter()
            .filter(|report| matches!(report.outcome, Outcome::Rewritten { .. }))
            .count()
    }

    /// Bare specifiers that were left as written, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&SpecifierReport, &ResolveFailure)> {
        self.specifiers.iter().filter_map(|report| match &report.outcome {
            Outcome::Failed { reason } => Some((report, reason)),
            _ => None,
        })
    }
}

/// Rewriter bound to one set of options and one filesystem.
///
/// Holds no state between calls; one instance can serve any number of
/// files, from any number of threads.
#[derive(Debug, Clone)]
pub struct ImportRewriter<F = OsFileSystem> {
    options: RewriteOptions,
    fs: F,
}

impl ImportRewriter {
    /// Create a rewriter over the host filesystem.
    #[must_use]
    pub fn new(options: RewriteOptions) -> Self {
        Self::with_fs(options, OsFileSystem)
    }
}

impl<F: FileSystem> ImportRewriter<F> {
    #[must_use]
    pub fn with_fs(options: RewriteOptions, fs: F) -> Self {
        Self { options, fs }
    }

    #[must_use]
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite `source`, which was read from `source_path`.
    #[must_use]
    pub fn rewrite(&self, source: &str, source_path: &Path) -> RewriteOutput {
        rewrite_with(source, source_path, &self.options, &self.fs)
    }

    /// Read and rewrite the file at `path`.
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteOutput, Error> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.rewrite(&source, path))
    }
}

/// Rewrite bare specifiers in `source` with default options.
#[must_use]
pub fn rewrite(source: &str, source_path: &Path) -> String {
    rewrite_with(source, source_path, &RewriteOptions::default(), &OsFileSystem).code
}

/// Rewrite bare specifiers in `source`, reporting every declaration.
///
/// The dependency store lookup happens at most once per call, on the first
/// bare specifier.
#[must_use]
pub fn rewrite_with(
    source: &str,
    source_path: &Path,
    options: &RewriteOptions,
    fs: &dyn FileSystem,
) -> RewriteOutput {
    let declarations = scan_declarations(source);
    let store = OnceCell::new();
    let mut edits = EditList::new();
    let mut specifiers = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let outcome = resolve_declaration(&declaration.specifier, source_path, options, fs, &store);
        if let Outcome::Rewritten { to } = &outcome {
            edits.push(declaration.span, to.as_str());
        }
        specifiers.push(SpecifierReport {
            specifier: declaration.specifier,
            span: declaration.span,
            line: declaration.line,
            kind: declaration.kind,
            outcome,
        });
    }

    RewriteOutput {
        code: edits.apply(source),
        specifiers,
    }
}

/// Read the file at `path` and rewrite it.
///
/// Failing to read the file is the only error; resolution problems are
/// reported per declaration.
pub fn rewrite_file(path: &Path, options: &RewriteOptions) -> Result<RewriteOutput, Error> {
    ImportRewriter::new(options.clone()).rewrite_file(path)
}

/// Rewrite on tokio's blocking pool.
///
/// Returns `source` unchanged if the blocking task does not complete.
pub async fn rewrite_async(source: String, source_path: PathBuf, options: RewriteOptions) -> String {
    let original = source.clone();
    tokio::task::spawn_blocking(move || {
        rewrite_with(&source, &source_path, &options, &OsFileSystem).code
    })
    .await
    .unwrap_or(original)
}

fn resolve_declaration(
    specifier: &str,
    source_path: &Path,
    options: &RewriteOptions,
    fs: &dyn FileSystem,
    store: &OnceCell<Result<PathBuf, ResolveFailure>>,
) -> Outcome {
    let kind = classify_with(specifier, &options.builtins);
    if !kind.needs_resolution() {
        return Outcome::Unchanged { kind };
    }

    let store = store.get_or_init(|| find_dependency_root(source_path, &options.store_dir, fs));
    let resolved = match store {
        Ok(store) => resolve_in_store(store, specifier, options, fs),
        Err(failure) => Err(failure.clone()),
    };

    match resolved {
        Ok(to) => Outcome::Rewritten { to },
        Err(reason) => Outcome::Failed { reason },
    }
}
