//! One form per document operation

use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

use super::array_field::ArrayAppender;
use super::error::FormError;
use super::generator::{synthesize_field, ErrorMarker, FieldIndex, FieldNode, ScalarField, Scope};
use super::getter::Getter;
use super::options::FormOptions;
use super::types::PropertyPath;
use crate::domain::definition::{DeclaredParameter, ParameterDefinition};
use crate::domain::document::{Operation, SwaggerDocument};

/// The synthesized form of one operation: its field tree, the getter over
/// it and an index of its fields by qualified path
#[derive(Clone, Debug)]
pub struct OperationForm {
    /// `"{METHOD} {path}"`, also the container id every field id starts with
    pub id: String,
    pub method: String,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub fields: Vec<FieldNode>,
    getter: Getter,
    index: FieldIndex,
}

impl OperationForm {
    /// Synthesize `params` into a form whose container id is `id`
    pub fn from_parameters(
        id: &str,
        params: &[ParameterDefinition],
        options: Rc<FormOptions>,
    ) -> Result<Self, FormError> {
        let declared: Vec<DeclaredParameter> = params.iter().cloned().map(Into::into).collect();
        Self::from_declared(id, &declared, options)
    }

    /// Synthesize parameters as declared in a document.
    ///
    /// A malformed entry becomes an inline marker. A name declared in more
    /// than one location (path `id` and query `id`) is bound under a
    /// namespace per location, so both read as `{"path": {"id": ..}, "query": {"id": ..}}`
    /// with identifiers such as `op-query.id`.
    pub fn from_declared(
        id: &str,
        params: &[DeclaredParameter],
        options: Rc<FormOptions>,
    ) -> Result<Self, FormError> {
        let scope = Scope::new(id, options);
        let getter = Getter::new();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for name in params.iter().filter_map(DeclaredParameter::name) {
            *occurrences.entry(name).or_default() += 1;
        }

        let mut fields = Vec::with_capacity(params.len());
        for (position, declared) in params.iter().enumerate() {
            let name = declared
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("parameter{}", position));

            let (namespace, path) = if occurrences.get(name.as_str()).copied().unwrap_or(0) > 1 {
                let location = declared.location().unwrap_or("unspecified");
                warn!(
                    "Param '{}' is declared in several locations, binding it under '{}'",
                    name, location
                );
                let namespace = getter
                    .nested(location)
                    .unwrap_or_else(|| getter.define_nested(location));
                (namespace, PropertyPath::root().push_property(location).push_property(&name))
            } else {
                (getter.clone(), PropertyPath::root().push_property(&name))
            };

            let node = match declared.parse() {
                Ok(param) => synthesize_field(&scope, &param, &namespace, &path, false)?,
                Err(e) => scope.error_marker(
                    &path,
                    FormError::MalformedParameter {
                        field: name,
                        reason: e.to_string(),
                    },
                ),
            };
            fields.push(node);
        }

        Ok(Self {
            id: id.to_string(),
            method: String::new(),
            path: String::new(),
            operation_id: None,
            summary: None,
            tags: Vec::new(),
            fields,
            getter,
            index: scope.index().clone(),
        })
    }

    pub fn getter(&self) -> &Getter {
        &self.getter
    }

    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// Scalar field at a qualified path such as `body.tags[0]`
    pub fn field(&self, path: &str) -> Option<ScalarField> {
        self.index.scalar(path)
    }

    /// Append affordance of the array at a qualified path
    pub fn array(&self, path: &str) -> Option<ArrayAppender> {
        self.index.array(path)
    }

    /// Current getter snapshot, absent fields omitted
    pub fn values(&self) -> Value {
        self.getter.snapshot()
    }

    /// Every error marker in the tree, appended items included
    pub fn errors(&self) -> Vec<ErrorMarker> {
        let mut errors = Vec::new();
        self.walk(&mut |node| {
            if let FieldNode::Error(marker) = node {
                errors.push(marker.clone());
            }
        });
        errors
    }

    /// Identifiers of every field and container, depth first
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id().to_string()));
        ids
    }

    pub fn walk(&self, visit: &mut dyn FnMut(&FieldNode)) {
        for field in &self.fields {
            field.walk(visit);
        }
    }
}

/// Build the form of one operation
pub fn synthesize_operation(
    method: &str,
    path: &str,
    operation: &Operation,
    options: Rc<FormOptions>,
) -> Result<OperationForm, FormError> {
    let method = method.to_uppercase();
    let id = format!("{} {}", method, path);
    debug!("Synthesizing {} ({} parameters)", id, operation.parameters.len());

    let form = OperationForm::from_declared(&id, &operation.parameters, options)?;
    Ok(OperationForm {
        method,
        path: path.to_string(),
        operation_id: operation.operation_id.clone(),
        summary: operation.summary.clone(),
        tags: operation.tags.clone(),
        ..form
    })
}

/// Build one form per operation in document order.
///
/// References resolve against the document itself, whatever registry
/// `options` carried.
pub fn synthesize_document(
    document: &SwaggerDocument,
    options: FormOptions,
) -> Result<Vec<OperationForm>, FormError> {
    let options = Rc::new(options.with_definitions(document.registry().clone()));
    let forms = document
        .operations()
        .map(|(method, path, operation)| synthesize_operation(method, path, operation, options.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Synthesized {} forms for {} {}",
        forms.len(),
        document.info.title,
        document.info.version
    );
    Ok(forms)
}
