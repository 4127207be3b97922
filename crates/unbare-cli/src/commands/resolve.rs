use super::absolutize;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use unbare_core::resolver::classify_with;
use unbare_core::{
    resolve_specifier, Config, OsFileSystem, Resolution, ResolveFailure, ResolvedEntry,
    SpecifierKind,
};

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    specifier: &'a str,
    from: &'a Path,
    kind: SpecifierKind,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a ResolvedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a ResolveFailure>,
}

/// Run the resolve command.
///
/// Prints the loader path for a bare specifier, `unchanged` for anything
/// that is not bare, or the failure code. Failing to resolve exits non-zero.
pub fn run(config: &Config, specifier: &str, from: Option<&Path>, json: bool) -> Result<()> {
    let importer: PathBuf = from.map_or_else(
        || config.cwd.join("index.js"),
        |path| absolutize(&config.cwd, path),
    );
    let kind = classify_with(specifier, &config.rewrite.builtins);
    let result = resolve_specifier(specifier, &importer, &config.rewrite, &OsFileSystem);
    debug!(specifier, from = %importer.display(), %kind, ?result, "resolved");

    let (status, to, reason) = match &result {
        Ok(Resolution::Passthrough { .. }) => ("unchanged", None, None),
        Ok(Resolution::Resolved { to }) => ("resolved", Some(to), None),
        Err(failure) => ("failed", None, Some(failure)),
    };

    if json {
        let output = ResolveOutput {
            specifier,
            from: &importer,
            kind,
            status,
            to,
            reason,
        };
        let out = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{out}");
    } else {
        match (to, reason) {
            (Some(to), _) => println!("{to}"),
            (_, Some(reason)) => println!("{}", reason.code()),
            _ => println!("{specifier} ({kind}, unchanged)"),
        }
    }

    match reason {
        Some(reason) => Err(miette!("{specifier}: {reason}")),
        None => Ok(()),
    }
}
