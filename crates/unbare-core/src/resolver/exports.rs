//! Package.json `exports` field evaluation for the package root.
//!
//! Supports the shapes packages use for their main entry:
//! - `exports: "./index.js"` (string shorthand)
//! - `exports: { ".": <target> }`
//! - `exports: { "import": ..., "require": ..., "default": ... }` (root conditions)
//! - fallback arrays: `exports: ["./a.js", "./b.js"]`
//!
//! Conditions are matched by priority (`import`, then `default`), so the ESM
//! entry wins over `require` regardless of key order. Nested condition
//! objects are followed one level deep.

use serde_json::{Map, Value};

/// Conditions honored when selecting an export target, highest priority first.
pub const IMPORT_CONDITIONS: &[&str] = &["import", "default"];

/// Nested condition objects deeper than this are ignored.
const MAX_CONDITION_DEPTH: usize = 1;

/// Resolve the root (`"."`) export of a manifest's `exports` value.
///
/// Returns the target path (starting with `./`) if one is declared.
#[must_use]
pub fn resolve_exports_root(exports: &Value) -> Option<String> {
    match exports {
        Value::String(_) | Value::Array(_) => resolve_target(exports, 0),
        Value::Object(obj) => {
            if let Some(dot) = obj.get(".") {
                return resolve_target(dot, 0);
            }
            // Subpath-only maps ("./feature": ...) declare no root entry
            if is_conditions_object(obj) {
                return resolve_conditions(obj, 0);
            }
            None
        }
        _ => None,
    }
}

/// Check whether an exports object is keyed by conditions rather than subpaths.
fn is_conditions_object(obj: &Map<String, Value>) -> bool {
    !obj.is_empty() && obj.keys().all(|k| !k.starts_with('.'))
}

/// Resolve an export target: a path, a fallback array, or a conditions object.
fn resolve_target(target: &Value, depth: usize) -> Option<String> {
    match target {
        Value::String(s) => validate_export_path(s),
        Value::Array(items) => items.iter().find_map(|item| resolve_target(item, depth)),
        Value::Object(obj) => resolve_conditions(obj, depth),
        _ => None,
    }
}

/// Pick the first honored condition whose target yields a path.
fn resolve_conditions(conditions: &Map<String, Value>, depth: usize) -> Option<String> {
    IMPORT_CONDITIONS.iter().find_map(|condition| {
        let target = conditions.get(*condition)?;
        match target {
            Value::Object(_) if depth >= MAX_CONDITION_DEPTH => None,
            Value::Object(nested) => resolve_conditions(nested, depth + 1),
            _ => resolve_target(target, depth),
        }
    })
}

/// Export targets must be package-relative (`./...`).
fn validate_export_path(path: &str) -> Option<String> {
    if path.starts_with("./") {
        Some(path.to_string())
    } else {
        None
    }
}
