//! Owned entity schema built from a parsed FGD document.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::field::FieldDef;
use super::instance::EntityInstance;
use crate::error::{FgdError, Result};
use crate::fgd::EntityClass;

/// A selectable entity class entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOption {
    /// Entity classname
    pub classname: String,
    /// Human-readable label, the classname when the class has no description
    pub description: String,
}

/// A loaded set of entity classes.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: Vec<EntityClass>,
    source: Option<PathBuf>,
}

impl Schema {
    /// Build a schema from parsed entity classes.
    ///
    /// Fails with [`FgdError::NoEntities`] when `classes` is empty.
    pub fn from_entities(classes: Vec<EntityClass>, source: Option<PathBuf>) -> Result<Self> {
        if classes.is_empty() {
            let name = source
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string());
            return Err(FgdError::no_entities(name));
        }
        Ok(Self { classes, source })
    }

    /// All entity classes in source order.
    pub fn classes(&self) -> &[EntityClass] {
        &self.classes
    }

    /// Path the schema was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// File name of the source path.
    pub fn source_name(&self) -> Option<String> {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Find an entity class. Later definitions shadow earlier ones.
    pub fn lookup(&self, classname: &str) -> Option<&EntityClass> {
        self.classes.iter().rev().find(|c| c.classname == classname)
    }

    /// Whether the schema defines `classname`.
    pub fn contains(&self, classname: &str) -> bool {
        self.lookup(classname).is_some()
    }

    /// One entry per distinct classname, in order of first appearance.
    pub fn class_options(&self) -> Vec<ClassOption> {
        let mut seen = HashSet::new();
        self.classes
            .iter()
            .filter(|c| seen.insert(c.classname.as_str()))
            .filter_map(|c| self.lookup(&c.classname))
            .map(|c| ClassOption {
                classname: c.classname.clone(),
                description: if c.description.is_empty() {
                    c.classname.clone()
                } else {
                    c.description.clone()
                },
            })
            .collect()
    }

    /// Editable fields of `classname`, in attribute order.
    pub fn fields_for(&self, classname: &str) -> Result<Vec<FieldDef>> {
        let class = self
            .lookup(classname)
            .ok_or_else(|| FgdError::unknown_class(classname))?;
        Ok(class
            .attributes
            .iter()
            .filter_map(FieldDef::from_attribute)
            .collect())
    }

    /// One editable field of `classname`.
    ///
    /// Internal (`_`-prefixed) attributes are not editable and are reported
    /// as unknown.
    pub fn field(&self, classname: &str, name: &str) -> Result<FieldDef> {
        let class = self
            .lookup(classname)
            .ok_or_else(|| FgdError::unknown_class(classname))?;
        class
            .attribute(name)
            .and_then(FieldDef::from_attribute)
            .ok_or_else(|| FgdError::unknown_field(classname, name))
    }

    /// Union of editable fields over all classes; the first definition of a name wins.
    pub fn property_fields(&self) -> Vec<FieldDef> {
        let mut seen = HashSet::new();
        self.classes
            .iter()
            .flat_map(|c| c.attributes.iter())
            .filter_map(FieldDef::from_attribute)
            .filter(|f| seen.insert(f.name.clone()))
            .collect()
    }

    /// Create an instance of `classname` seeded with default values.
    pub fn instantiate(&self, classname: &str) -> Result<EntityInstance> {
        let fields = self.fields_for(classname)?;
        Ok(EntityInstance::new(classname, fields))
    }
}
