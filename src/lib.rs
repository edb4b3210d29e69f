//! # FGD Core
//!
//! A tolerant parser for FGD (Forge Game Data) entity schema files.
//!
//! This library provides:
//! - A single-pass FGD parser that recovers from malformed input
//! - Structured diagnostics for everything it had to skip
//! - An editor-facing schema: field kinds, defaults and entity instances
//! - Atomic loading and replacement of the active schema
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`fgd`] - Scanner, parser and data model for FGD documents
//! - [`schema`] - Field synthesis, schema lookup and the schema store
//! - [`error`] - Error type for file, schema and output failures
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! fgd base.fgd --format summary
//! fgd base.fgd --class light
//! RUST_LOG=debug fgd base.fgd > entities.json
//! ```
//!
//! ### Library
//!
//! ```
//! let doc = fgd_core::fgd::parse(r#"@PointClass = info_null : "Nothing" []"#);
//! assert_eq!(doc.entities[0].classname, "info_null");
//! assert!(doc.diagnostics.is_empty());
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { parse_fgd } from 'fgd_core';
//!
//! const entities = JSON.parse(parse_fgd(fgdText));
//! ```
//!
//! ## Parsing Method
//!
//! The parser walks the input once with a forward-only cursor:
//!
//! 1. Skip whitespace, `//` comments and stray characters until `@`
//! 2. Read the class header parameters up to `=`, then classname and description
//! 3. Read attribute clauses up to `]`, attaching `choices` blocks to the
//!    attribute they follow
//!
//! Every scan that looks for a terminator is bounded, so unterminated strings
//! and groups end in a diagnostic rather than a hang.

pub mod error;
pub mod fgd;
pub mod schema;

// Re-export main types for convenience
pub use error::{FgdError, Result};
pub use fgd::{parse, Attribute, Choice, EntityClass, FgdDocument, Model, ParserConfig};
pub use schema::{Schema, SchemaStore};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmFgdSchema;

/// Conventional file extension for FGD files
pub const FGD_EXTENSION: &str = "fgd";
