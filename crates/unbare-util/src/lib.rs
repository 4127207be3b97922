#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Filesystem helpers for the unbare CLI.
//!
//! Pure functions with no logging; the CLI decides what to report.

pub mod fs;
pub mod sources;

pub use fs::{read_source, write_if_changed, WriteResult};
pub use sources::{collect_sources, is_source_file, SOURCE_EXTENSIONS};
