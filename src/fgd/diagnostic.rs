//! Non-fatal parse diagnostics.

use std::fmt;

/// Maximum number of source characters captured in a diagnostic snippet.
pub const SNIPPET_LEN: usize = 50;

/// Category of a recoverable parse anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A parenthesized group ran off the end of input
    UnbalancedParentheses,
    /// A quoted string ran off the end of input
    UnterminatedString,
    /// A bounded scan hit its step limit before finding its terminator
    ScanLimitExceeded,
    /// An attribute line had no parenthesized type
    MalformedAttribute,
    /// A `model(...)` parameter was kept as raw text
    ModelNotStructured,
    /// A `choices = [...]` block had no attribute to attach to
    OrphanChoices,
}

impl DiagnosticKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::UnbalancedParentheses => "unbalanced parentheses",
            Self::UnterminatedString => "unterminated string",
            Self::ScanLimitExceeded => "scan limit exceeded",
            Self::MalformedAttribute => "failed to parse attribute type",
            Self::ModelNotStructured => "model parameter kept as raw path",
            Self::OrphanChoices => "choices block without a preceding attribute",
        }
    }
}

/// A recoverable anomaly, located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Character offset where the failing construct started
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Source text starting at `offset`
    pub snippet: String,
}

impl Diagnostic {
    /// Build a diagnostic for `kind` at `offset` within `source`.
    pub fn at(kind: DiagnosticKind, source: &[char], offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.iter().filter(|&&c| c == '\n').count() + 1;
        let column = match before.iter().rposition(|&c| c == '\n') {
            Some(nl) => offset - nl,
            None => offset + 1,
        };
        let end = (offset + SNIPPET_LEN).min(source.len());
        Self {
            kind,
            offset,
            line,
            column,
            snippet: source[offset..end].iter().collect(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: {} near: {}...",
            self.line,
            self.column,
            self.kind.describe(),
            self.snippet.escape_debug()
        )
    }
}
