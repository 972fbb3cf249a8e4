//! Object containers

use tracing::error;

use super::error::FormError;
use super::generator::{synthesize_field, ErrorMarker, FieldNode, Scope};
use super::getter::Getter;
use super::resolver::ResolvedDefinition;
use super::types::PropertyPath;

/// Grouping element for an object's properties
#[derive(Clone, Debug)]
pub struct ObjectContainer {
    pub id: String,
    pub path: PropertyPath,
    /// Legend shown on the group: the field name
    pub legend: String,
    pub description: Option<String>,
    /// Registry entry the object was copied from, if any
    pub definition_name: Option<String>,
    pub children: Vec<FieldNode>,
}

/// Build an object container and synthesize its properties into a fresh
/// nested getter namespace bound under the field name.
///
/// An object without `properties` renders with an inline marker and gets no
/// getter entry.
pub(crate) fn build_object(
    scope: &Scope,
    resolved: &ResolvedDefinition,
    getter: &Getter,
    path: &PropertyPath,
) -> Result<FieldNode, FormError> {
    let definition = &resolved.definition;
    let id = scope.identifier(path);
    scope.index().register_container(&id);

    let mut container = ObjectContainer {
        id,
        path: path.clone(),
        legend: definition.name.clone(),
        description: definition.description.clone(),
        definition_name: resolved.definition_name.clone(),
        children: Vec::new(),
    };

    let Some(properties) = &definition.properties else {
        let shape_error = FormError::MissingSchemaShape {
            field: definition.name.clone(),
            kind: "object",
            shape: "properties",
        };
        error!("{}", shape_error);
        container.children.push(FieldNode::Error(ErrorMarker {
            id: format!("{}#error", container.id),
            path: path.clone(),
            error: shape_error,
        }));
        return Ok(FieldNode::Object(container));
    };

    let nested = getter.define_nested(&definition.name);
    for (name, property) in properties {
        let inherited = definition
            .required
            .as_ref()
            .map(|required| required.covers(name))
            .unwrap_or(false);
        let child = synthesize_field(
            scope,
            &property.renamed(name.as_str()),
            &nested,
            &path.push_property(name),
            inherited,
        )?;
        container.children.push(child);
    }

    Ok(FieldNode::Object(container))
}
