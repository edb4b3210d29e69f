//! Parser for FGD (Forge Game Data) entity schema files.
//!
//! FGD files describe the entity classes a level editor can place, their
//! inheritance and their editable attributes. The grammar is loose: comments
//! and whitespace may appear almost anywhere and real-world files routinely
//! contain constructs a strict parser would reject. This parser is a single
//! forward pass that recovers locally from anything it does not understand.
//!
//! # Grammar Overview
//!
//! ```text
//! document    = { comment | entity | any_char }
//! comment     = "//" { any_char } newline
//! entity      = '@' class_type { parameter } '=' classname [':' string] ['[' { clause } ']']
//! parameter   = "base" group | "color" group | "size" group | "model" model_group | other
//! clause      = comment | attribute | "choices" choices
//! attribute   = name group [':' string [':' default { ':' default }]] [choices]
//! choices     = '=' '[' { key ':' string { any_char } newline } ']'
//! default     = string | number
//! key         = number | string
//!
//! group       = '(' balanced_text ')'
//! model_group = '(' balanced_text_with_braces ')'
//! name        = { letter | digit | '_' | '.' }
//! number      = { digit | '.' | '-' }
//! string      = '"' { any_char } '"'
//! ```
//!
//! # Example
//!
//! ```text
//! // Lights
//! @PointClass base(Targetname) color(255 255 0) size(-8 -8 -8, 8 8 8)
//!     model({'path': 'models/light.mdl'}) = light : "Light source"
//! [
//!     light(integer) : "Brightness" : 300
//!     style(choices) : "Style" : 0 =
//!     [
//!         0 : "Normal"
//!         1 : "Flicker"
//!     ]
//! ]
//! ```
//!
//! # Recovery
//!
//! Parsing never fails. Malformed clauses are skipped (a token, a line or a
//! balanced group at a time) and reported as [`Diagnostic`]s, which are both
//! logged and returned in the [`FgdDocument`].

mod ast;
mod diagnostic;
mod parser;
mod scanner;

pub use ast::*;
pub use diagnostic::{Diagnostic, DiagnosticKind, SNIPPET_LEN};
pub use parser::{AttributeClause, Parser};
pub use scanner::Scanner;

use crate::error::Result;

/// Step cap for [`ScanLimit::Fixed`] matching common FGD tooling.
pub const DEFAULT_FIXED_SCAN_LIMIT: usize = 1000;

/// How many characters a bounded scan may examine before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanLimit {
    /// At most the number of characters remaining in the input
    #[default]
    Proportional,
    /// At most this many characters, regardless of input length
    Fixed(usize),
}

impl ScanLimit {
    /// Step budget for a scan starting with `remaining` characters left.
    pub fn steps(&self, remaining: usize) -> usize {
        match self {
            ScanLimit::Proportional => remaining,
            ScanLimit::Fixed(limit) => *limit,
        }
    }
}

/// Configuration for the parser.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Budget for parenthesized-group and quoted-string scans.
    pub scan_limit: ScanLimit,
}

impl ParserConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan limit.
    ///
    /// `ScanLimit::Fixed(DEFAULT_FIXED_SCAN_LIMIT)` reproduces the behavior of
    /// tools that truncate long strings and groups.
    pub fn with_scan_limit(mut self, scan_limit: ScanLimit) -> Self {
        self.scan_limit = scan_limit;
        self
    }
}

/// Parse FGD text with the default configuration.
pub fn parse(input: &str) -> FgdDocument {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse FGD text with a custom configuration.
pub fn parse_with_config(input: &str, config: &ParserConfig) -> FgdDocument {
    Parser::new(input, config).parse()
}

/// Parse an FGD file.
pub fn parse_file(path: &std::path::Path, config: &ParserConfig) -> Result<FgdDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::FgdError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_with_config(&content, config))
}
