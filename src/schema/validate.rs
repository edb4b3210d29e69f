//! Schema validation.

use std::collections::HashSet;

use crate::error::{FgdError, Result};

use super::Schema;

/// Validate a schema before it is handed to an editor.
///
/// Checks:
/// - The schema defines at least one entity class
/// - Duplicate classnames are reported (the last definition is used)
/// - Base classes that are never defined are reported
pub fn validate_schema(schema: &Schema) -> Result<()> {
    if schema.classes().is_empty() {
        let name = schema.source_name().unwrap_or_else(|| "<memory>".to_string());
        return Err(FgdError::no_entities(name));
    }

    let mut seen = HashSet::new();
    for class in schema.classes() {
        if !seen.insert(class.classname.as_str()) {
            log::warn!("entity class '{}' is defined more than once", class.classname);
        }
    }

    for class in schema.classes() {
        for base in class.base_classes() {
            if !seen.contains(base) {
                log::warn!("'{}' derives from undefined class '{}'", class.classname, base);
            }
        }
    }

    Ok(())
}
