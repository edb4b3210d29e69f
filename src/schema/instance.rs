//! Editable values for one placed entity.

use super::field::FieldDef;
use super::types::FieldValue;
use crate::error::{FgdError, Result};

/// An entity of a given class with one value per editable field.
#[derive(Debug, Clone)]
pub struct EntityInstance {
    classname: String,
    fields: Vec<FieldDef>,
    values: Vec<FieldValue>,
}

impl EntityInstance {
    /// Create an instance with every field at its default.
    pub fn new(classname: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        let values = fields.iter().map(|f| f.default.clone()).collect();
        Self {
            classname: classname.into(),
            fields,
            values,
        }
    }

    /// Entity classname.
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Current value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index_of(name).map(|i| &self.values[i])
    }

    /// Assign a field value.
    ///
    /// The value must match the field's kind, and choice values must be one
    /// of the field's options.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| FgdError::unknown_field(&self.classname, name))?;
        let field = &self.fields[index];
        if !field.accepts(&value) {
            return Err(FgdError::FieldTypeMismatch {
                field: name.to_string(),
                expected: field.kind.to_string(),
                found: format!("{} '{}'", value.kind(), value),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Reset every field to its default.
    pub fn reset(&mut self) {
        for (value, field) in self.values.iter_mut().zip(&self.fields) {
            *value = field.default.clone();
        }
    }

    /// Key/value pairs to write on the entity: `classname` first, then each
    /// field in declaration order. Empty text values are left out.
    pub fn properties(&self) -> Vec<(String, String)> {
        let mut properties = vec![("classname".to_string(), self.classname.clone())];
        properties.extend(
            self.fields
                .iter()
                .zip(&self.values)
                .filter(|(_, value)| !value.is_empty())
                .map(|(field, value)| (field.name.clone(), value.to_string())),
        );
        properties
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
