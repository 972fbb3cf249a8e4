//! Schema-driven form synthesis.
//!
//! Walks a parameter definition tree and builds headless input controls for
//! it, together with a live [`Getter`] that reads the current value of every
//! field on demand.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use serde_json::json;
//! use swagger_form::domain::definition::ParameterDefinition;
//! use swagger_form::form::{FormOptions, OperationForm};
//!
//! let params: Vec<ParameterDefinition> = serde_json::from_value(json!([
//!     { "name": "limit", "type": "integer" },
//!     { "name": "tags", "type": "array", "collectionFormat": "csv", "items": { "type": "string" } }
//! ])).unwrap();
//!
//! let form = OperationForm::from_parameters("GET /pets", &params, Rc::new(FormOptions::default())).unwrap();
//! form.field("limit").unwrap().set_value("10");
//! form.field("tags[0]").unwrap().set_value("dog");
//! form.array("tags").unwrap().append().unwrap();
//! form.field("tags[1]").unwrap().set_value("cat");
//!
//! assert_eq!(form.values(), json!({ "limit": 10, "tags": "dog,cat" }));
//! ```

pub mod array_field;
pub mod control;
pub mod enablement;
pub mod enum_field;
pub mod error;
pub mod fields;
pub mod generator;
pub mod getter;
pub mod object_field;
pub mod operation;
pub mod options;
pub mod outline;
pub mod resolver;
pub mod types;

pub use array_field::{format_collection, ArrayAppender, ArrayContainer};
pub use control::{ConstraintHints, Control, ControlKind, ControlState};
pub use enablement::EnableToggle;
pub use enum_field::{EnumWidget, RadioGroup};
pub use error::FormError;
pub use fields::{parse_number, ScalarInput};
pub use generator::{
    synthesize_field, synthesize_param, ErrorMarker, FieldIndex, FieldNode, Label, ScalarField, Scope,
};
pub use getter::{Accessor, Getter};
pub use object_field::ObjectContainer;
pub use operation::{synthesize_document, synthesize_operation, OperationForm};
pub use options::FormOptions;
pub use outline::{render_outline, write_outline};
pub use resolver::{resolve_definition, ResolvedDefinition};
pub use types::{FieldType, FileHandle, PathSegment, PropertyPath, WidgetKind};
