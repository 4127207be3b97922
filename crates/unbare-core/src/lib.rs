#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod fs;
pub mod imports;
pub mod resolver;
pub mod rewrite;
pub mod version;

pub use config::{Config, RewriteOptions};
pub use error::Error;
pub use fs::{FileSystem, OsFileSystem};
pub use imports::{scan_declarations, DeclarationKind, ImportDeclaration, Span};
pub use resolver::{
    classify, resolve_specifier, PackageReference, Resolution, ResolveFailure, ResolvedEntry,
    SpecifierKind,
};
pub use rewrite::{
    rewrite, rewrite_async, rewrite_file, rewrite_with, ImportRewriter, Outcome, RewriteOutput,
    SpecifierReport,
};
pub use version::{VersionInfo, VERSION};
