//! Editable field synthesis from parsed attributes.

use serde::Serialize;

use super::types::{FieldKind, FieldValue};
use crate::fgd::{Attribute, Choice};

/// An editor field derived from one attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    /// Attribute key
    pub name: String,
    /// Display label
    pub label: String,
    /// Tooltip text
    pub description: String,
    /// Field kind
    pub kind: FieldKind,
    /// Initial value
    pub default: FieldValue,
    /// Allowed values for [`FieldKind::Choice`] fields
    pub options: Vec<Choice>,
}

impl FieldDef {
    /// Build a field for `attribute`.
    ///
    /// Returns `None` for internal (`_`-prefixed) attributes.
    pub fn from_attribute(attribute: &Attribute) -> Option<Self> {
        if attribute.is_internal() {
            return None;
        }

        let kind = FieldKind::classify(attribute);
        let default = attribute.default.as_deref().unwrap_or("");
        let options = match kind {
            FieldKind::Choice => attribute.choices.clone().unwrap_or_default(),
            _ => Vec::new(),
        };

        let default = match kind {
            FieldKind::Integer => FieldValue::Integer(parse_or_zero(&attribute.name, default)),
            FieldKind::Float => FieldValue::Float(parse_or_zero(&attribute.name, default)),
            FieldKind::Boolean => FieldValue::Boolean(parse_bool(default)),
            FieldKind::Choice => FieldValue::Choice(choice_default(&attribute.name, default, &options)),
            FieldKind::String => FieldValue::String(default.to_string()),
        };

        let label = if attribute.name.is_empty() {
            attribute.description.clone()
        } else {
            attribute.name.clone()
        };

        Some(Self {
            name: attribute.name.clone(),
            label,
            description: attribute.description.clone(),
            kind,
            default,
            options,
        })
    }

    /// Whether `value` is acceptable for this field.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self.kind, value) {
            (FieldKind::Choice, FieldValue::Choice(v)) => self.options.iter().any(|c| &c.value == v),
            (kind, value) => kind == value.kind(),
        }
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(name: &str, text: &str) -> T {
    let text = text.trim();
    if text.is_empty() {
        return T::default();
    }
    text.parse().unwrap_or_else(|_| {
        log::warn!("default '{}' of '{}' is not a number, using zero", text, name);
        T::default()
    })
}

fn parse_bool(text: &str) -> bool {
    !matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no"
    )
}

fn choice_default(name: &str, default: &str, options: &[Choice]) -> String {
    if options.iter().any(|c| c.value == default) {
        return default.to_string();
    }
    if !default.is_empty() {
        log::warn!("default '{}' of '{}' is not one of its choices", default, name);
    }
    options.first().map(|c| c.value.clone()).unwrap_or_default()
}
