//! Span replacement against an immutable source buffer.

use crate::imports::Span;

/// Replace the bytes in `span` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub text: String,
}

/// Ordered set of non-overlapping edits, applied in one pass.
#[derive(Debug, Default)]
pub struct EditList {
    edits: Vec<Edit>,
}

impl EditList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: Span, text: impl Into<String>) {
        self.edits.push(Edit {
            span,
            text: text.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Build the edited text. Bytes outside edit spans are copied unchanged.
    ///
    /// Edits are applied in span order. An edit overlapping an earlier one, or
    /// reaching past the end of `source`, is dropped.
    #[must_use]
    pub fn apply(mut self, source: &str) -> String {
        if self.edits.is_empty() {
            return source.to_string();
        }

        self.edits.sort_by_key(|edit| edit.span);

        let growth: usize = self.edits.iter().map(|edit| edit.text.len()).sum();
        let mut out = String::with_capacity(source.len() + growth);
        let mut cursor = 0;

        for edit in &self.edits {
            let Span { start, end } = edit.span;
            if start < cursor
                || end > source.len()
                || !source.is_char_boundary(start)
                || !source.is_char_boundary(end)
            {
                continue;
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.text);
            cursor = end;
        }

        out.push_str(&source[cursor..]);
        out
    }
}
