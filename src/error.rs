//! Error types for the FGD toolkit.
//!
//! This module provides a unified error type [`FgdError`] for the operations
//! that can genuinely fail: reading files, building a schema, looking up
//! classes and fields, and serializing output. Parsing FGD text itself never
//! fails; malformed input is reported through [`crate::fgd::Diagnostic`]s.

use thiserror::Error;

/// Result type alias using [`FgdError`].
pub type Result<T> = std::result::Result<T, FgdError>;

/// Unified error type for all FGD operations.
#[derive(Error, Debug)]
pub enum FgdError {
    // ============ I/O Errors ============
    /// Error reading an FGD file
    #[error("Failed to read FGD file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Schema Errors ============
    /// Parsing succeeded but produced no entity classes
    #[error("No entities found in FGD source '{source_name}'")]
    NoEntities { source_name: String },

    /// Classname not present in the loaded schema
    #[error("Unknown entity class '{classname}'")]
    UnknownClass { classname: String },

    /// Field not present on an entity class
    #[error("Entity class '{classname}' has no editable field '{field}'")]
    UnknownField { classname: String, field: String },

    /// Value assigned to a field does not match the field's kind
    #[error("Field '{field}' expects a {expected} value, got {found}")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    // ============ Output Errors ============
    /// JSON serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FgdError {
    /// Create a no-entities error
    pub fn no_entities(source_name: impl Into<String>) -> Self {
        Self::NoEntities {
            source_name: source_name.into(),
        }
    }

    /// Create an unknown class error
    pub fn unknown_class(classname: impl Into<String>) -> Self {
        Self::UnknownClass {
            classname: classname.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(classname: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            classname: classname.into(),
            field: field.into(),
        }
    }
}
