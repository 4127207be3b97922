#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use unbare_core::Config;

#[derive(Parser, Debug)]
#[command(name = "unbare")]
#[command(author, version, about = "Rewrite bare import specifiers to loadable paths", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Rewrite bare specifiers in source files
    Rewrite {
        /// Files or directories to rewrite
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Write results back to the files instead of printing them
        #[arg(long)]
        write: bool,
    },

    /// Resolve a single specifier
    Resolve {
        /// The specifier to resolve (e.g. "preact" or "@scope/pkg/sub.js")
        specifier: String,

        /// File the specifier is imported from [default: <cwd>/index.js]
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::load(cwd.clone())
        .into_diagnostic()?
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Rewrite { paths, write }) => {
            let span = tracing::info_span!("rewrite", cmd = "rewrite", cwd = %cwd.display());
            let _guard = span.enter();
            commands::rewrite::run(&config, &paths, write, cli.json)
        }
        Some(Commands::Resolve { specifier, from }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            commands::resolve::run(&config, &specifier, from.as_deref(), cli.json)
        }
    }
}
