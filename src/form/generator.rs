//! Recursive field synthesis.
//!
//! [`synthesize_field`] resolves a definition, dispatches on its type and
//! returns the rendered [`FieldNode`]. Scalars get their control, label and
//! enable toggle here; objects and arrays recurse through their container
//! builders, which call back into this module for every child.

use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use tracing::{error, warn};

use super::array_field::{build_array, AppenderInner, ArrayAppender, ArrayContainer};
use super::control::{Control, ControlKind};
use super::enablement::EnableToggle;
use super::error::FormError;
use super::fields::{build_scalar, file_handles, ScalarInput};
use super::getter::{Getter, ReadFn};
use super::object_field::{build_object, ObjectContainer};
use super::options::FormOptions;
use super::resolver::ResolutionContext;
use super::types::{PropertyPath, WidgetKind};
use crate::domain::definition::ParameterDefinition;

// ============================================================================
// Rendered Nodes
// ============================================================================

/// One rendered element of a form tree
#[derive(Clone, Debug)]
pub enum FieldNode {
    Scalar(ScalarField),
    Object(ObjectContainer),
    Array(ArrayContainer),
    Error(ErrorMarker),
}

impl FieldNode {
    pub fn id(&self) -> &str {
        match self {
            FieldNode::Scalar(field) => &field.id,
            FieldNode::Object(object) => &object.id,
            FieldNode::Array(array) => &array.id,
            FieldNode::Error(marker) => &marker.id,
        }
    }

    pub fn path(&self) -> &PropertyPath {
        match self {
            FieldNode::Scalar(field) => &field.path,
            FieldNode::Object(object) => &object.path,
            FieldNode::Array(array) => &array.path,
            FieldNode::Error(marker) => &marker.path,
        }
    }

    /// Direct children of a container, empty for leaves
    pub fn children(&self) -> Vec<FieldNode> {
        match self {
            FieldNode::Object(object) => object.children.clone(),
            FieldNode::Array(array) => array.items(),
            FieldNode::Scalar(_) | FieldNode::Error(_) => Vec::new(),
        }
    }

    /// Visit this node and every descendant, depth first
    pub fn walk(&self, visit: &mut dyn FnMut(&FieldNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Label shown in front of a scalar field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub for_id: String,
    pub text: String,
    pub required: bool,
    pub title: String,
}

/// Inline marker rendered in place of a field that could not be built
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorMarker {
    pub id: String,
    pub path: PropertyPath,
    pub error: FormError,
}

impl ErrorMarker {
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Presentation class of the marker
    pub fn class(&self) -> &'static str {
        "error"
    }
}

/// A leaf field: its physical input, label and enable toggle
#[derive(Clone)]
pub struct ScalarField {
    pub id: String,
    pub path: PropertyPath,
    pub name: String,
    pub widget: WidgetKind,
    pub input: ScalarInput,
    pub label: Label,
    pub toggle: EnableToggle,
    reader: ReadFn,
}

impl std::fmt::Debug for ScalarField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarField")
            .field("id", &self.id)
            .field("widget", &self.widget)
            .field("input", &self.input)
            .field("toggle", &self.toggle)
            .finish_non_exhaustive()
    }
}

impl ScalarField {
    /// Current getter value of the field
    pub fn read(&self) -> Option<Value> {
        (self.reader)()
    }

    pub fn controls(&self) -> Vec<Control> {
        self.input.controls()
    }

    pub fn kind(&self) -> ControlKind {
        self.input.kind()
    }

    pub fn is_required(&self) -> bool {
        self.toggle.is_required()
    }

    pub fn is_enabled(&self) -> bool {
        self.toggle.is_checked()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.toggle.set_checked(enabled);
    }

    /// Apply user input given as text.
    ///
    /// Checkboxes accept `true`/`false`, enums one of their values, file
    /// controls a comma separated list of file names. Returns false when the
    /// text does not fit the control.
    pub fn set_value(&self, raw: &str) -> bool {
        let control = match &self.input {
            ScalarInput::Enum(widget) => return widget.select(raw),
            ScalarInput::Control(control) => control,
        };
        match control.kind() {
            ControlKind::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => control.set_checked(true),
                "false" | "0" | "off" | "no" | "" => control.set_checked(false),
                _ => return false,
            },
            ControlKind::File => control.set_files(file_handles(raw)),
            _ => control.set_value(raw),
        }
        true
    }

    /// Raw display state, as an input element would show it
    pub fn raw_value(&self) -> String {
        match &self.input {
            ScalarInput::Enum(widget) => widget.current().unwrap_or_default(),
            ScalarInput::Control(control) => match control.kind() {
                ControlKind::Checkbox => control.is_checked().to_string(),
                ControlKind::File => control
                    .files()
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                _ => control.value(),
            },
        }
    }
}

// ============================================================================
// Field Index
// ============================================================================

#[derive(Default)]
struct IndexInner {
    scalars: IndexMap<String, ScalarField>,
    arrays: IndexMap<String, Weak<AppenderInner>>,
    ids: HashSet<String>,
}

/// Qualified path → field lookup for one form.
///
/// Array appenders are held weakly; the form tree owns them.
#[derive(Clone, Default)]
pub struct FieldIndex {
    inner: Rc<RefCell<IndexInner>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_id(&self, id: &str) {
        if !self.inner.borrow_mut().ids.insert(id.to_string()) {
            warn!("Identifier '{}' is used more than once in the form", id);
        }
    }

    pub(crate) fn register_scalar(&self, field: &ScalarField) {
        self.claim_id(&field.id);
        self.inner
            .borrow_mut()
            .scalars
            .insert(field.path.to_string(), field.clone());
    }

    pub(crate) fn register_array(&self, id: &str, path: &PropertyPath, appender: &ArrayAppender) {
        self.claim_id(id);
        self.inner
            .borrow_mut()
            .arrays
            .insert(path.to_string(), appender.downgrade());
    }

    pub(crate) fn register_container(&self, id: &str) {
        self.claim_id(id);
    }

    pub fn scalar(&self, path: &str) -> Option<ScalarField> {
        self.inner.borrow().scalars.get(path).cloned()
    }

    pub fn array(&self, path: &str) -> Option<ArrayAppender> {
        let weak = self.inner.borrow().arrays.get(path).cloned()?;
        ArrayAppender::upgrade(&weak)
    }

    /// Qualified paths of every scalar field, in synthesis order
    pub fn scalar_paths(&self) -> Vec<String> {
        self.inner.borrow().scalars.keys().cloned().collect()
    }

    pub fn array_paths(&self) -> Vec<String> {
        self.inner.borrow().arrays.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.borrow();
        inner.scalars.len() + inner.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FieldIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldIndex")
            .field("scalars", &self.scalar_paths())
            .field("arrays", &self.array_paths())
            .finish()
    }
}

// ============================================================================
// Synthesis Scope
// ============================================================================

/// What every recursive call shares: the container id, the options and the
/// index of the form being built. `ancestors` holds the references expanded
/// on the way down to the current field.
#[derive(Clone, Debug)]
pub struct Scope {
    container_id: Rc<str>,
    options: Rc<FormOptions>,
    index: FieldIndex,
    ancestors: Vec<String>,
}

impl Scope {
    pub fn new(container_id: &str, options: Rc<FormOptions>) -> Self {
        Self {
            container_id: Rc::from(container_id),
            options,
            index: FieldIndex::new(),
            ancestors: Vec::new(),
        }
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Scope for the children of a container reached through `references`
    fn descend(&self, references: &[String]) -> Scope {
        let mut scope = self.clone();
        scope.ancestors.extend(references.iter().cloned());
        scope
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// `{container id}-{qualified path}`
    pub fn identifier(&self, path: &PropertyPath) -> String {
        format!("{}-{}", self.container_id, path)
    }

    pub(crate) fn error_marker(&self, path: &PropertyPath, error: FormError) -> FieldNode {
        error!("{}", error);
        FieldNode::Error(ErrorMarker {
            id: self.identifier(path),
            path: path.clone(),
            error,
        })
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Synthesize a top-level parameter, binding it on `getter` under its name
pub fn synthesize_param(
    scope: &Scope,
    param: &ParameterDefinition,
    getter: &Getter,
) -> Result<FieldNode, FormError> {
    let path = PropertyPath::root().push_property(&param.name);
    synthesize_field(scope, param, getter, &path, false)
}

/// Synthesize one field at `path`.
///
/// The field is bound on `getter` under `param.name`. `inherited_required`
/// comes from the enclosing object's `required` list and applies when the
/// field declares no boolean `required` of its own.
///
/// Recoverable failures come back as [`FieldNode::Error`]; only
/// [`FormError::MissingEnumList`] is returned as `Err`.
pub fn synthesize_field(
    scope: &Scope,
    param: &ParameterDefinition,
    getter: &Getter,
    path: &PropertyPath,
    inherited_required: bool,
) -> Result<FieldNode, FormError> {
    let mut context =
        ResolutionContext::with_ancestors(&scope.options.definitions, scope.ancestors.iter().cloned());
    let resolved = match context.resolve(param) {
        Ok(resolved) => resolved,
        Err(e) => return Ok(scope.error_marker(path, e)),
    };

    let Some(widget) = resolved.field_type.widget() else {
        let error = FormError::UnknownType {
            type_name: resolved.field_type.to_string(),
            field: param.name.clone(),
        };
        return Ok(scope.error_marker(path, error));
    };
    if resolved.field_type.is_alias() {
        warn!(
            "Type '{}' for param '{}' is not a Swagger type, treating it as {}",
            resolved.field_type,
            param.name,
            widget.as_str()
        );
    }

    match widget {
        WidgetKind::Object => {
            build_object(&scope.descend(&resolved.references), &resolved, getter, path)
        }
        WidgetKind::Array => build_array(&scope.descend(&resolved.references), &resolved, getter, path),
        _ => {
            let required = resolved.definition.required_flag().unwrap_or(inherited_required);
            let field = build_scalar_field(scope, widget, &resolved.definition, path, required)?;
            getter.define_shared(&param.name, field.reader.clone());
            scope.index.register_scalar(&field);
            Ok(FieldNode::Scalar(field))
        }
    }
}

fn build_scalar_field(
    scope: &Scope,
    widget: WidgetKind,
    definition: &ParameterDefinition,
    path: &PropertyPath,
    required: bool,
) -> Result<ScalarField, FormError> {
    let id = scope.identifier(path);
    let built = build_scalar(widget, &id, definition, required, &scope.options)?;
    let toggle = EnableToggle::new(&id, required, &scope.options, built.input.controls());
    let label = Label {
        for_id: id.clone(),
        text: format!("{}: ", definition.name),
        required,
        title: definition.description.clone().unwrap_or_default(),
    };

    Ok(ScalarField {
        id,
        path: path.clone(),
        name: definition.name.clone(),
        widget,
        input: built.input,
        label,
        toggle,
        reader: built.reader,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope_with(definitions: Value) -> Scope {
        Scope::new("op", Rc::new(FormOptions::default().with_definitions(definitions)))
    }

    fn param(value: Value) -> ParameterDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_binding() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(&scope, &param(json!({ "name": "limit", "type": "integer" })), &getter).unwrap();

        let FieldNode::Scalar(field) = node else {
            panic!("expected scalar");
        };
        assert_eq!(field.id, "op-limit");
        assert_eq!(field.label.text, "limit: ");
        assert!(field.set_value("25"));
        assert_eq!(getter.read("limit"), Some(json!(25)));
        assert!(scope.index().scalar("limit").is_some());
    }

    #[test]
    fn test_disable_and_reenable() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(&scope, &param(json!({ "name": "q", "type": "string" })), &getter).unwrap();
        let FieldNode::Scalar(field) = node else {
            panic!("expected scalar");
        };

        field.set_value("cats");
        field.set_enabled(false);
        assert_eq!(getter.read("q"), None);
        assert_eq!(field.raw_value(), "cats");
        field.set_enabled(true);
        assert_eq!(getter.read("q"), Some(json!("cats")));
    }

    #[test]
    fn test_required_field_cannot_be_disabled() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(
            &scope,
            &param(json!({ "name": "id", "type": "integer", "required": true })),
            &getter,
        )
        .unwrap();
        let FieldNode::Scalar(field) = node else {
            panic!("expected scalar");
        };
        assert!(field.label.required);
        field.set_enabled(false);
        assert!(field.is_enabled());
        assert_eq!(getter.read("id"), Some(json!(0)));
    }

    #[test]
    fn test_unknown_type_renders_marker() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(&scope, &param(json!({ "name": "w", "type": "widget" })), &getter).unwrap();
        let FieldNode::Error(marker) = node else {
            panic!("expected error marker");
        };
        assert_eq!(marker.message(), "Unknown type 'widget' for param 'w'");
        assert_eq!(marker.class(), "error");
        assert!(!getter.contains("w"));
    }

    #[test]
    fn test_alias_type_still_builds() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(&scope, &param(json!({ "name": "n", "type": "number" })), &getter).unwrap();
        assert!(matches!(node, FieldNode::Scalar(ref f) if f.kind() == ControlKind::Number));
    }

    #[test]
    fn test_missing_reference_renders_marker() {
        let scope = scope_with(json!({ "definitions": {} }));
        let getter = Getter::new();
        let node = synthesize_param(
            &scope,
            &param(json!({ "name": "body", "schema": { "$ref": "#/definitions/Pet" } })),
            &getter,
        )
        .unwrap();
        assert!(matches!(node, FieldNode::Error(_)));
        assert!(getter.is_empty());
    }

    #[test]
    fn test_checkbox_set_value() {
        let scope = scope_with(Value::Null);
        let getter = Getter::new();
        let node = synthesize_param(&scope, &param(json!({ "name": "flag", "type": "boolean" })), &getter).unwrap();
        let FieldNode::Scalar(field) = node else {
            panic!("expected scalar");
        };
        assert!(field.set_value("true"));
        assert_eq!(getter.read("flag"), Some(json!(true)));
        assert!(!field.set_value("maybe"));
        assert_eq!(field.raw_value(), "true");
    }
}
