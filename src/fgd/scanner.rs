//! Cursor-based scanner primitives for FGD text.
//!
//! The scanner owns an immutable character buffer and a forward-only cursor.
//! Every bounded scan (parenthesized groups, quoted strings, model groups)
//! stops after a configurable number of steps, so unterminated input always
//! resolves to an absent result plus a [`Diagnostic`] instead of a hang.

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::ScanLimit;

/// Scanner over a single FGD source buffer.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    limit: ScanLimit,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    /// Create a scanner positioned at the start of `input`.
    pub fn new(input: &str, limit: ScanLimit) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            limit,
            diagnostics: Vec::new(),
        }
    }

    /// Current cursor position (character offset).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total number of characters in the input.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the cursor has reached the end of input.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Whether the character under the cursor is `ch`.
    pub fn peek_is(&self, ch: char) -> bool {
        self.peek() == Some(ch)
    }

    /// Whether the character under the cursor satisfies `pred`.
    pub fn peek_matches(&self, pred: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    /// Whether the input at the cursor starts with `text`.
    pub fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    /// Whether `keyword` starts at the cursor and is followed by `(` or whitespace.
    pub fn keyword_at(&self, keyword: &str) -> bool {
        if !self.starts_with(keyword) {
            return false;
        }
        let next = self.chars.get(self.pos + keyword.chars().count()).copied();
        matches!(next, Some(c) if c == '(' || c.is_whitespace())
    }

    /// Move the cursor forward by one character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Move the cursor forward by `n` characters, clamped to the end of input.
    pub fn bump(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    /// Advance past a run of whitespace, including newlines.
    pub fn consume_whitespace(&mut self) {
        while self.peek_matches(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Advance to just past the next newline, or to the end of input.
    pub fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Discard the rest of a malformed entry.
    ///
    /// Stops after the next newline, or before a `]` that is not inside a
    /// quoted string, so a one-line block keeps its terminator.
    pub fn skip_entry(&mut self) {
        let mut quoted = false;
        while let Some(ch) = self.peek() {
            if ch == ']' && !quoted {
                break;
            }
            self.pos += 1;
            match ch {
                '\n' => break,
                '"' => quoted = !quoted,
                _ => {}
            }
        }
    }

    /// Parse a possibly empty run of alphanumerics, `_` and `.`.
    pub fn parse_identifier(&mut self) -> String {
        self.consume_whitespace();
        self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '.')
    }

    /// Parse a run of digits, `.` and `-`, returned as raw text.
    pub fn parse_number(&mut self) -> String {
        self.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-')
    }

    /// Parse a run of digits and `-` (choice keys).
    pub fn parse_signed_integer(&mut self) -> String {
        self.take_while(|c| c.is_ascii_digit() || c == '-')
    }

    /// Parse a balanced `( ... )` group and return its trimmed interior.
    ///
    /// Returns `None` when the cursor is not at `(` or the group is never
    /// closed within the scan limit.
    pub fn parse_parentheses(&mut self) -> Option<String> {
        self.consume_whitespace();
        if !self.peek_is('(') {
            return None;
        }
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;

        let max_steps = self.limit.steps(self.remaining());
        let mut depth = 1usize;
        let mut steps = 0;
        while depth > 0 && steps < max_steps {
            let Some(ch) = self.peek() else { break };
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            self.pos += 1;
            steps += 1;
        }

        if depth > 0 {
            self.report_scan_failure(DiagnosticKind::UnbalancedParentheses, open);
            return None;
        }
        Some(self.slice(start, self.pos - 1).trim().to_string())
    }

    /// Parse a `"..."` string and return its trimmed interior.
    ///
    /// A missing opening quote yields an empty string without a diagnostic;
    /// a missing closing quote yields an empty string with one.
    pub fn parse_string(&mut self) -> String {
        self.consume_whitespace();
        if !self.peek_is('"') {
            return String::new();
        }
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;

        let max_steps = self.limit.steps(self.remaining());
        let mut steps = 0;
        while steps < max_steps {
            match self.peek() {
                Some('"') | None => break,
                Some(_) => {
                    self.pos += 1;
                    steps += 1;
                }
            }
        }

        if !self.peek_is('"') {
            self.report_scan_failure(DiagnosticKind::UnterminatedString, open);
            return String::new();
        }
        let text = self.slice(start, self.pos).trim().to_string();
        self.pos += 1;
        text
    }

    /// Parse the `( ... )` group of a `model` parameter.
    ///
    /// Parentheses inside `{ ... }` regions do not count towards nesting, so
    /// structured literals are captured whole. The interior is returned raw.
    pub fn parse_model_parameter(&mut self) -> Option<String> {
        self.consume_whitespace();
        if !self.peek_is('(') {
            return None;
        }
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;

        let max_steps = self.limit.steps(self.remaining());
        let mut braces = 0usize;
        let mut depth = 1usize;
        let mut steps = 0;
        while depth > 0 && steps < max_steps {
            let Some(ch) = self.peek() else { break };
            match ch {
                '{' => braces += 1,
                '}' => braces = braces.saturating_sub(1),
                '(' if braces == 0 => depth += 1,
                ')' if braces == 0 => depth -= 1,
                _ => {}
            }
            self.pos += 1;
            steps += 1;
        }

        if depth > 0 {
            self.report_scan_failure(DiagnosticKind::UnbalancedParentheses, open);
            return None;
        }
        Some(self.slice(start, self.pos - 1).trim().to_string())
    }

    /// Record a diagnostic at `offset` and forward it to the log.
    pub fn report(&mut self, kind: DiagnosticKind, offset: usize) {
        let diagnostic = Diagnostic::at(kind, &self.chars, offset);
        match kind {
            DiagnosticKind::ModelNotStructured => log::debug!("{}", diagnostic),
            _ => log::warn!("{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Take the diagnostics recorded so far.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report_scan_failure(&mut self, unterminated: DiagnosticKind, offset: usize) {
        let kind = if self.is_at_end() {
            unterminated
        } else {
            DiagnosticKind::ScanLimitExceeded
        };
        self.report(kind, offset);
    }

    fn remaining(&self) -> usize {
        self.chars.len().saturating_sub(self.pos)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek_matches(&pred) {
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }
}
