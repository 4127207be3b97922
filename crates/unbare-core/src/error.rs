use std::path::PathBuf;
use thiserror::Error;

/// Core error type for whole-operation failures.
///
/// Resolution problems for individual specifiers are never reported through
/// this type; see [`crate::resolver::ResolveFailure`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read source at {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
