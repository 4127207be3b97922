//! Import declaration discovery for JavaScript/TypeScript sources.
//!
//! Provides a lightweight scanner that locates static import/export-from
//! declarations and the exact byte span of each specifier literal.

mod scan;

pub use scan::{scan_declarations, DeclarationKind, ImportDeclaration, Span};
