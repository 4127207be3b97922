//! Package manifest (`package.json`) fields used for entry resolution.

use serde_json::Value;
use thiserror::Error;

/// Manifest file name inside a package directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Why a manifest's text could not be used.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,
}

/// Entry-related fields of a package manifest.
///
/// Fields with an unexpected JSON type are treated as absent rather than
/// failing the whole manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub main: Option<String>,
    pub module: Option<String>,
    pub exports: Option<Value>,
}

impl PackageManifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Extract fields from an already-parsed manifest.
    pub fn from_value(value: &Value) -> Result<Self, ManifestError> {
        let obj = value.as_object().ok_or(ManifestError::NotAnObject)?;
        let string_field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            name: string_field("name"),
            main: string_field("main"),
            module: string_field("module"),
            exports: obj.get("exports").filter(|v| !v.is_null()).cloned(),
        })
    }
}
