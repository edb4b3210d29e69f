//! Core types for editable entity fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fgd::Attribute;

/// Editor field kind, resolved once from an attribute's free-text type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Whole number
    Integer,
    /// Floating-point number
    Float,
    /// On/off toggle
    Boolean,
    /// One of an enumerated set of choice values
    Choice,
    /// Free text
    String,
}

impl FieldKind {
    /// Classify an attribute.
    ///
    /// Non-empty choices take precedence over the declared type; otherwise
    /// the lower-cased type is matched by substring.
    pub fn classify(attribute: &Attribute) -> Self {
        if attribute.has_choices() {
            return Self::Choice;
        }
        let attr_type = attribute.attr_type.to_lowercase();
        if attr_type.contains("integer") {
            Self::Integer
        } else if attr_type.contains("float") || attr_type.contains("decimal") {
            Self::Float
        } else if attr_type.contains("boolean") {
            Self::Boolean
        } else {
            Self::String
        }
    }

    /// Lower-case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::String => "string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Selected choice key
    Choice(String),
    String(String),
}

impl FieldValue {
    /// Kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Choice(_) => FieldKind::Choice,
            Self::String(_) => FieldKind::String,
        }
    }

    /// Whether the value is an empty string or choice.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Choice(s) | Self::String(s) if s.is_empty())
    }
}

/// Renders the value the way it is written into an entity's key/value pairs.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Boolean(v) => f.write_str(if *v { "1" } else { "0" }),
            Self::Choice(v) | Self::String(v) => f.write_str(v),
        }
    }
}
