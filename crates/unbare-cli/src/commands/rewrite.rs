use super::absolutize;
use miette::{miette, IntoDiagnostic, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use unbare_core::rewrite::Outcome;
use unbare_core::{Config, ImportRewriter, SpecifierReport};
use unbare_util::{collect_sources, read_source, write_if_changed, WriteResult};

/// Per-file result, as printed in `--json` mode.
#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    rewritten: usize,
    unresolved: usize,
    /// Whether the file on disk was replaced (`--write` only).
    written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    specifiers: Vec<SpecifierReport>,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: Vec<FileReport>,
    rewritten: usize,
    unresolved: usize,
    errors: usize,
}

/// Run the rewrite command.
///
/// Each file is an independent rewrite, so files are processed in parallel.
pub fn run(config: &Config, paths: &[PathBuf], write: bool, json: bool) -> Result<()> {
    let roots: Vec<PathBuf> = paths.iter().map(|p| absolutize(&config.cwd, p)).collect();
    let files = collect_sources(&roots, &config.rewrite.store_dir);
    if files.is_empty() {
        return Err(miette!("no source files found"));
    }
    debug!(files = files.len(), "collected sources");

    let rewriter = ImportRewriter::new(config.rewrite.clone());
    let keep_code = !write && (json || files.len() == 1);
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| process_file(&rewriter, path, write, keep_code))
        .collect();

    let summary = Summary {
        rewritten: reports.iter().map(|r| r.rewritten).sum(),
        unresolved: reports.iter().map(|r| r.unresolved).sum(),
        errors: reports.iter().filter(|r| r.error.is_some()).count(),
        files: reports,
    };

    if json {
        let out = serde_json::to_string_pretty(&summary).into_diagnostic()?;
        println!("{out}");
    } else {
        print_human(&summary, write);
    }

    info!(
        files = summary.files.len(),
        rewritten = summary.rewritten,
        unresolved = summary.unresolved,
        "rewrite finished"
    );

    if summary.errors > 0 {
        return Err(miette!("{} file(s) could not be rewritten", summary.errors));
    }
    Ok(())
}

fn process_file(
    rewriter: &ImportRewriter,
    path: &Path,
    write: bool,
    keep_code: bool,
) -> FileReport {
    let mut report = FileReport {
        path: path.to_path_buf(),
        rewritten: 0,
        unresolved: 0,
        written: false,
        code: None,
        error: None,
        specifiers: Vec::new(),
    };

    // In-place writes need the original bytes back: strict UTF-8 only
    let read = if write {
        std::fs::read_to_string(path)
    } else {
        read_source(path)
    };
    let source = match read {
        Ok(source) => source,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read source");
            report.error = Some(e.to_string());
            return report;
        }
    };

    let output = rewriter.rewrite(&source, path);
    log_outcomes(path, &output.specifiers);
    report.rewritten = output.rewritten_count();
    report.unresolved = output.failures().count();

    if write && output.code != source {
        match write_if_changed(path, &output.code) {
            Ok(result) => report.written = result == WriteResult::Written,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write");
                report.error = Some(e.to_string());
            }
        }
    }

    if keep_code {
        report.code = Some(output.code);
    }
    report.specifiers = output.specifiers;
    report
}

fn log_outcomes(path: &Path, specifiers: &[SpecifierReport]) {
    for report in specifiers {
        match &report.outcome {
            Outcome::Rewritten { to } => debug!(
                path = %path.display(),
                line = report.line,
                specifier = %report.specifier,
                to = %to,
                "rewrote specifier"
            ),
            Outcome::Failed { reason } => debug!(
                path = %path.display(),
                line = report.line,
                specifier = %report.specifier,
                code = reason.code(),
                reason = %reason,
                "left specifier unchanged"
            ),
            Outcome::Unchanged { kind } => tracing::trace!(
                path = %path.display(),
                line = report.line,
                specifier = %report.specifier,
                kind = %kind,
                "not bare"
            ),
        }
    }
}

fn print_human(summary: &Summary, write: bool) {
    // A single file without --write prints its rewritten text
    if let [file] = summary.files.as_slice() {
        if let Some(code) = &file.code {
            print!("{code}");
            return;
        }
    }

    for file in &summary.files {
        let path = file.path.display();
        if let Some(error) = &file.error {
            println!("{path}: error: {error}");
        } else if write {
            let status = if file.written { "written" } else { "unchanged" };
            println!(
                "{path}: {status} ({} rewritten, {} unresolved)",
                file.rewritten, file.unresolved
            );
        } else {
            println!(
                "{path}: {} rewritten, {} unresolved",
                file.rewritten, file.unresolved
            );
        }
    }
}
