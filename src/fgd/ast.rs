//! Data model produced by the FGD parser.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::diagnostic::Diagnostic;

/// One key/description pair of an enumerated attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Choice key, usually an integer literal kept as text
    pub value: String,
    /// Human-readable label
    pub description: String,
}

/// A typed, named field of an entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute key (e.g. `targetname`, `damage_zone.head`)
    pub name: String,
    /// Raw text inside the type parentheses (e.g. `integer`, `color255`)
    #[serde(rename = "type")]
    pub attr_type: String,
    /// Short description, empty when absent
    pub description: String,
    /// Default value as written in the source
    pub default: Option<String>,
    /// Enumerated values in source order
    pub choices: Option<Vec<Choice>>,
}

impl Attribute {
    /// Create an attribute without default or choices.
    pub fn new(
        name: impl Into<String>,
        attr_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attr_type: attr_type.into(),
            description: description.into(),
            default: None,
            choices: None,
        }
    }

    /// Whether the attribute is internal (`_`-prefixed) and hidden from editors.
    pub fn is_internal(&self) -> bool {
        self.name.starts_with('_')
    }

    /// Whether the attribute carries at least one choice.
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// The `model(...)` parameter of an entity class.
///
/// Serializes as a JSON object in both cases: the decoded map, or
/// `{"path": <raw text>}` when the parameter was not a structured literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub enum Model {
    /// Successfully decoded key/value literal
    Structured(Map<String, Value>),
    /// Plain model path: undecodable text kept verbatim, a quoted string, or
    /// a literal whose only key is `path`
    Path(String),
}

impl Model {
    /// Model path, if the model is a plain path or a structured literal with a `path` key.
    pub fn path(&self) -> Option<&str> {
        match self {
            Model::Path(path) => Some(path),
            Model::Structured(map) => map.get("path").and_then(Value::as_str),
        }
    }

    /// Model as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.clone().into())
    }
}

impl From<Model> for Map<String, Value> {
    fn from(model: Model) -> Self {
        match model {
            Model::Structured(map) => map,
            Model::Path(path) => {
                let mut map = Map::new();
                map.insert("path".to_string(), Value::String(path));
                map
            }
        }
    }
}

impl From<Map<String, Value>> for Model {
    fn from(map: Map<String, Value>) -> Self {
        if map.len() == 1 {
            if let Some(Value::String(path)) = map.get("path") {
                return Model::Path(path.clone());
            }
        }
        Model::Structured(map)
    }
}

/// One `@ClassType ... = classname : "description" [ ... ]` unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityClass {
    /// Lower-cased class keyword (`pointclass`, `solidclass`, `baseclass`, ...)
    pub class_type: String,
    /// Raw `base(...)` text, possibly a comma-separated list
    pub base: Option<String>,
    /// Raw `color(...)` text
    pub color: Option<String>,
    /// Raw `size(...)` text
    pub size: Option<String>,
    /// Decoded `model(...)` parameter
    pub model: Option<Model>,
    /// Entity classname
    pub classname: String,
    /// Entity description, empty when absent
    pub description: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
}

impl EntityClass {
    /// Base classnames listed in `base(...)`, trimmed and without empties.
    pub fn base_classes(&self) -> Vec<&str> {
        self.base
            .as_deref()
            .map(|b| {
                b.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Result of parsing one FGD document.
#[derive(Debug, Clone, Default)]
pub struct FgdDocument {
    /// Entity classes in source order, duplicates kept
    pub entities: Vec<EntityClass>,
    /// Recoverable anomalies encountered while parsing
    pub diagnostics: Vec<Diagnostic>,
}

impl FgdDocument {
    /// Whether the document produced no entity classes.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Split into entities and diagnostics.
    pub fn into_parts(self) -> (Vec<EntityClass>, Vec<Diagnostic>) {
        (self.entities, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_serializes_as_object() {
        let model = Model::Path("models/barrel.mdl".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"{"path":"models/barrel.mdl"}"#);

        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_structured_model_keeps_keys() {
        let model: Model = serde_json::from_str(r#"{"path":"a.mdl","skin":2}"#).unwrap();
        assert!(matches!(model, Model::Structured(_)));
        assert_eq!(model.path(), Some("a.mdl"));
        assert_eq!(model.to_value()["skin"], 2);
    }

    #[test]
    fn test_base_classes_split() {
        let entity = EntityClass {
            class_type: "pointclass".to_string(),
            base: Some("Targetname, Angle ,".to_string()),
            color: None,
            size: None,
            model: None,
            classname: "info_null".to_string(),
            description: String::new(),
            attributes: Vec::new(),
        };
        assert_eq!(entity.base_classes(), vec!["Targetname", "Angle"]);
    }

    #[test]
    fn test_attribute_type_field_name() {
        let attr = Attribute::new("health", "integer", "Health");
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["type"], "integer");
        assert!(json["default"].is_null());
    }
}
