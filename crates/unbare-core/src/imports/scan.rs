//! Import/export declaration scanner.
//!
//! Finds static `import ... from "x"`, `import "x"` and `export ... from "x"`
//! declarations without full parsing and records the byte span of each
//! specifier literal. Comments, string literals, template literals and
//! regular expression literals are skipped, so specifier-like text inside
//! them is never reported.
//!
//! Dynamic `import("x")` calls and `import.meta` are not declarations and are
//! left alone.

use serde::Serialize;

/// Byte range `start..end` into the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice this span out of `source`.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Syntactic form of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `import x from "pkg"`, `import { a } from "pkg"`, `import * as ns from "pkg"`
    Import,
    /// `import "pkg"`
    SideEffect,
    /// `export { a } from "pkg"`, `export * from "pkg"`
    ExportFrom,
}

impl DeclarationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "esm_import",
            Self::SideEffect => "esm_side_effect",
            Self::ExportFrom => "esm_export",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One static import/export-from declaration.
///
/// `span.slice(source) == specifier` always holds: the specifier is the raw
/// literal text between the quotes, escapes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Specifier exactly as written between the quotes.
    pub specifier: String,
    /// Literal contents, quote characters excluded.
    pub span: Span,
    /// Whole declaration, from the keyword through the closing quote.
    pub statement: Span,
    pub kind: DeclarationKind,
    /// Line of the keyword (1-indexed).
    pub line: u32,
}

/// Scan source text for static import/export-from declarations.
///
/// Declarations are returned in source order. Repeated specifiers are kept:
/// every declaration is reported, since each one owns its own span.
#[must_use]
pub fn scan_declarations(source: &str) -> Vec<ImportDeclaration> {
    let mut scanner = Scanner::new(source);
    scanner.run();
    let mut declarations = scanner.found;
    assign_lines(source, &mut declarations);
    declarations
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Whether a `/` at the current position starts a regex literal.
    regex_allowed: bool,
    /// Last byte of the previous significant token.
    prev: Option<u8>,
    found: Vec<ImportDeclaration>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            regex_allowed: true,
            prev: None,
            found: Vec::new(),
        }
    }

    fn run(&mut self) {
        let len = self.bytes.len();

        // Hashbang
        if self.bytes.starts_with(b"#!") {
            self.pos = skip_line(self.bytes, 0);
        }

        while self.pos < len {
            let b = self.bytes[self.pos];

            if is_space(b) {
                self.pos += 1;
                continue;
            }

            match b {
                b'/' if self.peek(1) == Some(b'/') => {
                    self.pos = skip_line(self.bytes, self.pos);
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.pos = skip_block_comment(self.bytes, self.pos);
                }
                b'/' => {
                    if self.regex_allowed {
                        self.pos = skip_regex(self.bytes, self.pos);
                        self.token_end(false);
                    } else {
                        self.pos += 1;
                        self.token_end(true);
                    }
                }
                b'\'' | b'"' => {
                    self.pos = skip_string(self.bytes, self.pos);
                    self.token_end(false);
                }
                b'`' => {
                    self.pos = skip_template(self.bytes, self.pos);
                    self.token_end(false);
                }
                b')' | b']' => {
                    self.pos += 1;
                    self.token_end(false);
                }
                b'0'..=b'9' => {
                    self.pos = skip_word(self.bytes, self.pos);
                    self.token_end(false);
                }
                _ if is_ident_start(b) => self.word(),
                _ => {
                    self.pos += 1;
                    self.token_end(true);
                }
            }
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn token_end(&mut self, regex_allowed: bool) {
        self.prev = Some(self.bytes[self.pos - 1]);
        self.regex_allowed = regex_allowed;
    }

    fn word(&mut self) {
        let src = self.src;
        let start = self.pos;
        let end = skip_word(self.bytes, start);
        let word = &src[start..end];
        // `obj.import` / `obj?.export` are property accesses
        let member = self.prev == Some(b'.');

        if !member {
            let declaration = match word {
                "import" => self.import_declaration(start, end),
                "export" => self.export_declaration(start, end),
                _ => None,
            };
            if let Some(declaration) = declaration {
                self.pos = declaration.statement.end;
                self.found.push(declaration);
                self.token_end(false);
                return;
            }
        }

        self.pos = end;
        self.token_end(!member && keyword_precedes_expression(word));
    }

    /// Parse what follows an `import` keyword spanning `kw_start..kw_end`.
    fn import_declaration(&self, kw_start: usize, kw_end: usize) -> Option<ImportDeclaration> {
        let p = skip_trivia(self.bytes, kw_end);
        match *self.bytes.get(p)? {
            // import("x") and import.meta
            b'(' | b'.' => None,
            b'\'' | b'"' => {
                let (span, end) = read_literal(self.bytes, p)?;
                Some(self.declaration(DeclarationKind::SideEffect, kw_start, span, end))
            }
            _ => self.clause(DeclarationKind::Import, kw_start, p),
        }
    }

    /// Parse what follows an `export` keyword; only re-exports qualify.
    fn export_declaration(&self, kw_start: usize, kw_end: usize) -> Option<ImportDeclaration> {
        let mut p = skip_trivia(self.bytes, kw_end);

        // export type { A } from "x"
        if self.bytes[p..].starts_with(b"type")
            && !self.bytes.get(p + 4).is_some_and(|&b| is_ident_part(b))
        {
            p = skip_trivia(self.bytes, p + 4);
        }

        match *self.bytes.get(p)? {
            b'*' | b'{' => self.clause(DeclarationKind::ExportFrom, kw_start, p),
            _ => None,
        }
    }

    /// Walk an import/export clause up to `from "<specifier>"`.
    ///
    /// Bails out on anything that cannot appear in a declaration clause, so
    /// `export { a };` or `import x = require("y")` are never reported.
    fn clause(
        &self,
        kind: DeclarationKind,
        kw_start: usize,
        mut p: usize,
    ) -> Option<ImportDeclaration> {
        let mut depth = 0usize;
        let mut expect_from = false;

        loop {
            p = skip_trivia(self.bytes, p);
            let b = *self.bytes.get(p)?;

            match b {
                b'{' => {
                    if expect_from {
                        return None;
                    }
                    depth += 1;
                    p += 1;
                }
                b'}' => {
                    depth = depth.checked_sub(1)?;
                    p += 1;
                    if depth == 0 {
                        expect_from = true;
                    }
                }
                // import { "string name" as local } from "x"
                b'\'' | b'"' if depth > 0 => {
                    let (_, end) = read_literal(self.bytes, p)?;
                    p = end;
                }
                b',' | b'*' => {
                    if expect_from {
                        return None;
                    }
                    p += 1;
                }
                _ if is_ident_start(b) => {
                    let end = skip_word(self.bytes, p);
                    let word = &self.src[p..end];
                    p = end;

                    if depth > 0 {
                        continue;
                    }
                    if word == "from" {
                        let q = skip_trivia(self.bytes, p);
                        if let Some(b'\'' | b'"') = self.bytes.get(q).copied() {
                            let (span, end) = read_literal(self.bytes, q)?;
                            return Some(self.declaration(kind, kw_start, span, end));
                        }
                        // `import from from "x"`: the first `from` is a binding
                    }
                    if expect_from {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    fn declaration(
        &self,
        kind: DeclarationKind,
        kw_start: usize,
        span: Span,
        end: usize,
    ) -> ImportDeclaration {
        ImportDeclaration {
            specifier: span.slice(self.src).to_string(),
            span,
            statement: Span::new(kw_start, end),
            kind,
            line: 0,
        }
    }
}

/// Fill in 1-indexed line numbers in one pass over the source.
fn assign_lines(source: &str, declarations: &mut [ImportDeclaration]) {
    let bytes = source.as_bytes();
    let mut line: u32 = 1;
    let mut cursor = 0;

    for declaration in declarations {
        let target = declaration.statement.start;
        line += bytes[cursor..target].iter().filter(|&&b| b == b'\n').count() as u32;
        cursor = target;
        declaration.line = line;
    }
}

/// Keywords after which a `/` begins a regex rather than a division.
fn keyword_precedes_expression(word: &str) -> bool {
    matches!(
        word,
        "return"
            | "typeof"
            | "instanceof"
            | "in"
            | "of"
            | "new"
            | "delete"
            | "void"
            | "throw"
            | "case"
            | "do"
            | "else"
            | "yield"
            | "await"
            | "default"
    )
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b == b'#' || b >= 0x80
}

fn is_ident_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Skip an identifier (or numeric literal) starting at `pos`.
fn skip_word(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 1;
    let numeric = bytes[pos].is_ascii_digit();
    while i < bytes.len() && (is_ident_part(bytes[i]) || numeric && bytes[i] == b'.') {
        i += 1;
    }
    i
}

/// Skip whitespace and comments.
fn skip_trivia(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        if is_space(bytes[i]) {
            i += 1;
        } else if bytes[i..].starts_with(b"//") {
            i = skip_line(bytes, i);
        } else if bytes[i..].starts_with(b"/*") {
            i = skip_block_comment(bytes, i);
        } else {
            break;
        }
    }
    i
}

/// Skip to the newline ending the current line (the newline is not consumed).
fn skip_line(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Read a single-line quoted literal at `pos`.
///
/// Returns the contents span and the offset past the closing quote, or `None`
/// if the literal is unterminated.
fn read_literal(bytes: &[u8], pos: usize) -> Option<(Span, usize)> {
    let quote = bytes[pos];
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' | b'\r' => return None,
            b if b == quote => return Some((Span::new(pos + 1, i), i + 1)),
            _ => i += 1,
        }
    }
    None
}

/// Skip a string literal. Unterminated strings end at the line break.
fn skip_string(bytes: &[u8], pos: usize) -> usize {
    let quote = bytes[pos];
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip a template literal, including nested `${ ... }` expressions.
fn skip_template(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = skip_braced(bytes, i + 2),
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip code up to and including the `}` closing an already-open brace.
fn skip_braced(bytes: &[u8], pos: usize) -> usize {
    let mut depth = 1usize;
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => i = skip_string(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip a regex literal including its flags. A line break before the closing
/// slash means this was not a regex; scanning resumes at the break.
fn skip_regex(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 1;
    let mut in_class = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => {
                i += 1;
                while i < bytes.len() && is_ident_part(bytes[i]) {
                    i += 1;
                }
                return i;
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(source: &str) -> Vec<String> {
        scan_declarations(source)
            .into_iter()
            .map(|d| d.specifier)
            .collect()
    }

    #[test]
    fn test_import_default() {
        let source = r#"import foo from "lodash";"#;
        let decls = scan_declarations(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].specifier, "lodash");
        assert_eq!(decls[0].kind, DeclarationKind::Import);
        assert_eq!(decls[0].span, Span::new(17, 23));
        assert_eq!(decls[0].statement, Span::new(0, 24));
    }

    #[test]
    fn test_import_named_multiline() {
        let source = "import {\n  resolve,\n  // comment\n  dirname as d\n} from 'import-meta-resolve'\n";
        let decls = scan_declarations(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].specifier, "import-meta-resolve");
        assert_eq!(decls[0].span.slice(source), "import-meta-resolve");
    }

    #[test]
    fn test_import_default_and_named() {
        assert_eq!(specifiers("import path, { dirname } from 'path'"), ["path"]);
    }

    #[test]
    fn test_import_namespace() {
        assert_eq!(specifiers(r#"import * as utils from "./utils";"#), ["./utils"]);
    }

    #[test]
    fn test_side_effect_import() {
        let decls = scan_declarations(r#"import "./polyfill";"#);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].specifier, "./polyfill");
        assert_eq!(decls[0].kind, DeclarationKind::SideEffect);
    }

    #[test]
    fn test_export_from() {
        let decls = scan_declarations(r#"export { foo, bar as baz } from "./dep";"#);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].specifier, "./dep");
        assert_eq!(decls[0].kind, DeclarationKind::ExportFrom);
    }

    #[test]
    fn test_export_star_forms() {
        let source = r#"
export * from "a";
export * as ns from "b";
"#;
        assert_eq!(specifiers(source), ["a", "b"]);
    }

    #[test]
    fn test_typescript_type_forms() {
        let source = r#"
import type { A } from "types-a";
export type { B } from "types-b";
"#;
        assert_eq!(specifiers(source), ["types-a", "types-b"]);
    }

    #[test]
    fn test_local_export_not_reported() {
        let source = r#"
const a = 1;
export { a };
export const from = "nope";
import b from "real";
"#;
        assert_eq!(specifiers(source), ["real"]);
    }

    #[test]
    fn test_dynamic_import_and_meta_ignored() {
        let source = r#"
const mod = await import("dynamic");
const url = import.meta.url;
"#;
        assert!(scan_declarations(source).is_empty());
    }

    #[test]
    fn test_require_ignored() {
        assert!(scan_declarations(r#"const dep = require("dep");"#).is_empty());
    }

    #[test]
    fn test_member_access_ignored() {
        let source = r#"loader.import { x } from "nope"; obj.export * from "nope2";"#;
        assert!(scan_declarations(source).is_empty());
    }

    #[test]
    fn test_ignores_comments() {
        let source = r#"
// import foo from "line-comment"
/* import foo from "block-comment" */
/*
import baz from "multi-line"
*/
import bar from "./real";
"#;
        assert_eq!(specifiers(source), ["./real"]);
    }

    #[test]
    fn test_ignores_strings() {
        let source = r#"
const a = "import x from 'in-double'";
const b = 'export * from "in-single"';
import real from "real";
"#;
        assert_eq!(specifiers(source), ["real"]);
    }

    #[test]
    fn test_ignores_template_literals() {
        let source = r#"
const t = `
import x from "in-template"
${ `import y from "nested"` + { a: "}" }.a }
`;
import real from "real";
"#;
        assert_eq!(specifiers(source), ["real"]);
    }

    #[test]
    fn test_regex_with_quote_does_not_swallow_imports() {
        let source = r#"
const re = /['"]/g;
import real from "real";
const half = total / 2; import other from "other";
"#;
        assert_eq!(specifiers(source), ["real", "other"]);
    }

    #[test]
    fn test_string_names_in_braces() {
        let source = r#"import { "a-b" as ab } from "strings";"#;
        assert_eq!(specifiers(source), ["strings"]);
    }

    #[test]
    fn test_binding_named_from() {
        assert_eq!(specifiers(r#"import from from "pkg";"#), ["pkg"]);
    }

    #[test]
    fn test_import_equals_ignored() {
        assert!(scan_declarations(r#"import fs = require("fs");"#).is_empty());
    }

    #[test]
    fn test_unterminated_literal_ignored() {
        assert!(scan_declarations("import x from \"broken\n").is_empty());
    }

    #[test]
    fn test_repeated_specifiers_kept_in_order() {
        let source = r#"
import a from "./dep";
import b from "./dep";
import c from "./c";
"#;
        assert_eq!(specifiers(source), ["./dep", "./dep", "./c"]);
    }

    #[test]
    fn test_spans_match_specifiers() {
        let source = "/* ü */ import {\n  x } from 'ünïcode-pkg'\nexport * from \"@scope/pkg/sub\"";
        for decl in scan_declarations(source) {
            assert_eq!(decl.span.slice(source), decl.specifier);
            let open = &source[decl.span.start - 1..decl.span.start];
            let close = &source[decl.span.end..=decl.span.end];
            assert_eq!(open, close);
        }
    }

    #[test]
    fn test_line_numbers() {
        let source = r#"
import a from "./a";

import {
  b
} from "./b";
"#;
        let decls = scan_declarations(source);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].line, 2);
        assert_eq!(decls[1].line, 4);
    }

    #[test]
    fn test_hashbang() {
        let source = "#!/usr/bin/env node\nimport x from 'x';";
        assert_eq!(specifiers(source), ["x"]);
    }

    #[test]
    fn test_empty_source() {
        assert!(scan_declarations("").is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(scan_declarations("console.log('hello');").is_empty());
    }

    #[test]
    fn test_scoped_package() {
        assert_eq!(specifiers(r#"import test from "@scope/package";"#), ["@scope/package"]);
    }
}
