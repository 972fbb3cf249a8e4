//! Parameter definitions as they appear in a Swagger document.
//!
//! A [`ParameterDefinition`] describes one input field. It can be concrete
//! (`type` set), wrap a body schema (`schema`), or point at a registry entry
//! through `$ref`. Nested object properties and array items reuse the same
//! shape, so a single struct covers the whole definition tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `required` is a flag on parameters and a list of property names on object schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Flag(bool),
    Fields(Vec<String>),
}

impl Required {
    /// The boolean form, if this is a flag
    pub fn flag(&self) -> Option<bool> {
        match self {
            Required::Flag(flag) => Some(*flag),
            Required::Fields(_) => None,
        }
    }

    /// Whether a property with this name is required by the enclosing object
    pub fn covers(&self, property: &str) -> bool {
        match self {
            Required::Flag(flag) => *flag,
            Required::Fields(fields) => fields.iter().any(|f| f == property),
        }
    }
}

/// How an array value is collapsed into a single value when read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
    #[serde(other)]
    Other,
}

impl CollectionFormat {
    /// Separator used to join items, `None` when items are not joined
    pub fn separator(&self) -> Option<&'static str> {
        match self {
            CollectionFormat::Csv => Some(","),
            CollectionFormat::Ssv => Some(" "),
            CollectionFormat::Tsv => Some("\t"),
            CollectionFormat::Pipes => Some("|"),
            CollectionFormat::Multi | CollectionFormat::Other => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionFormat::Csv => "csv",
            CollectionFormat::Ssv => "ssv",
            CollectionFormat::Tsv => "tsv",
            CollectionFormat::Pipes => "pipes",
            CollectionFormat::Multi => "multi",
            CollectionFormat::Other => "other",
        }
    }
}

/// Declarative description of one input field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    #[serde(default)]
    pub name: String,
    /// Parameter location (query, path, body, ...). Informational only.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<ParameterDefinition>>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ParameterDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterDefinition {
    /// Shorthand for a named definition with a concrete type
    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    /// Same definition under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Reference path from `$ref` or `schema.$ref`
    pub fn reference_path(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .or_else(|| self.schema.as_ref().and_then(|s| s.reference.as_deref()))
    }

    /// Array items, declared directly or through `schema.items`
    pub fn item_definition(&self) -> Option<&ParameterDefinition> {
        self.items
            .as_deref()
            .or_else(|| self.schema.as_ref().and_then(|s| s.items.as_deref()))
    }

    /// Whether this definition carries anything the resolver can turn into a type
    pub fn is_typed(&self) -> bool {
        self.type_name.is_some() || self.reference_path().is_some() || self.schema.is_some()
    }

    /// Explicit boolean `required`, ignoring the property-list form
    pub fn required_flag(&self) -> Option<bool> {
        self.required.as_ref().and_then(Required::flag)
    }

    /// Enum values as display strings
    pub fn enum_strings(&self) -> Vec<String> {
        self.enum_values
            .as_ref()
            .map(|values| values.iter().map(value_to_display).collect())
            .unwrap_or_default()
    }

    /// Placeholder text derived from `example`
    pub fn example_text(&self) -> String {
        self.example.as_ref().map(value_to_display).unwrap_or_default()
    }

    /// Fill every field left unset here from `base`
    pub fn overlay(self, base: &ParameterDefinition) -> ParameterDefinition {
        let base = base.clone();
        ParameterDefinition {
            name: if self.name.is_empty() { base.name } else { self.name },
            location: self.location.or(base.location),
            type_name: self.type_name.or(base.type_name),
            schema: self.schema.or(base.schema),
            reference: self.reference.or(base.reference),
            required: self.required.or(base.required),
            enum_values: self.enum_values.or(base.enum_values),
            format: self.format.or(base.format),
            max_length: self.max_length.or(base.max_length),
            min_length: self.min_length.or(base.min_length),
            pattern: self.pattern.or(base.pattern),
            maximum: self.maximum.or(base.maximum),
            exclusive_maximum: self.exclusive_maximum.or(base.exclusive_maximum),
            minimum: self.minimum.or(base.minimum),
            exclusive_minimum: self.exclusive_minimum.or(base.exclusive_minimum),
            items: self.items.or(base.items),
            properties: self.properties.or(base.properties),
            min_items: self.min_items.or(base.min_items),
            max_items: self.max_items.or(base.max_items),
            collection_format: self.collection_format.or(base.collection_format),
            description: self.description.or(base.description),
            example: self.example.or(base.example),
            default: self.default.or(base.default),
        }
    }
}

/// A parameter as declared in an operation.
///
/// Entries whose fields carry the wrong JSON types are kept raw so the rest
/// of the operation still loads; synthesis turns them into inline markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredParameter {
    Parsed(ParameterDefinition),
    Malformed(Value),
}

impl DeclaredParameter {
    pub fn name(&self) -> Option<&str> {
        match self {
            DeclaredParameter::Parsed(param) => Some(param.name.as_str()),
            DeclaredParameter::Malformed(raw) => raw.get("name").and_then(Value::as_str),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            DeclaredParameter::Parsed(param) => param.location.as_deref(),
            DeclaredParameter::Malformed(raw) => raw.get("in").and_then(Value::as_str),
        }
    }

    /// The typed definition, or the reason the raw entry does not convert
    pub fn parse(&self) -> Result<ParameterDefinition, serde_json::Error> {
        match self {
            DeclaredParameter::Parsed(param) => Ok(param.clone()),
            DeclaredParameter::Malformed(raw) => serde_json::from_value(raw.clone()),
        }
    }
}

impl From<ParameterDefinition> for DeclaredParameter {
    fn from(param: ParameterDefinition) -> Self {
        DeclaredParameter::Parsed(param)
    }
}

/// Render a JSON value the way an input element would show it
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
