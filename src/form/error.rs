//! Error types for form synthesis

use thiserror::Error;

/// Errors raised while synthesizing a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A `$ref` path does not lead to a registry entry
    #[error("Definition '{reference}' not found for param '{field}'")]
    MissingDefinition { reference: String, field: String },

    /// A `$ref` chain loops back onto itself
    #[error("Circular reference '{reference}' for param '{field}'")]
    CircularReference { reference: String, field: String },

    /// A registry entry exists but does not convert into a definition
    #[error("Definition '{reference}' for param '{field}' is invalid: {reason}")]
    InvalidDefinition {
        reference: String,
        field: String,
        reason: String,
    },

    /// A declared parameter whose fields carry the wrong JSON types
    #[error("Parameter '{field}' is malformed: {reason}")]
    MalformedParameter { field: String, reason: String },

    /// The resolved type has no construction strategy
    #[error("Unknown type '{type_name}' for param '{field}'")]
    UnknownType { type_name: String, field: String },

    /// Object without `properties` (or array without `items`)
    #[error("This '{field}' {kind} parameter should have defined {shape}")]
    MissingSchemaShape {
        field: String,
        kind: &'static str,
        shape: &'static str,
    },

    /// The enum builder was reached without any enum values
    #[error("No enum found for parameter '{field}'")]
    MissingEnumList { field: String },
}

impl FormError {
    /// Whether synthesis can render an inline marker and carry on
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FormError::MissingEnumList { .. })
    }

    /// Field name the error belongs to
    pub fn field(&self) -> &str {
        match self {
            FormError::MissingDefinition { field, .. }
            | FormError::CircularReference { field, .. }
            | FormError::InvalidDefinition { field, .. }
            | FormError::MalformedParameter { field, .. }
            | FormError::UnknownType { field, .. }
            | FormError::MissingSchemaShape { field, .. }
            | FormError::MissingEnumList { field } => field,
        }
    }
}
