//! Swagger document and parameter definition models

pub mod definition;
pub mod document;

pub use definition::{CollectionFormat, DeclaredParameter, ParameterDefinition, Required};
pub use document::{DocumentError, Info, Operation, PathItem, SwaggerDocument};
