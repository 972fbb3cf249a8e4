//! Parameter resolution with $ref support
//!
//! Turns a [`ParameterDefinition`] into a [`ResolvedDefinition`] carrying a
//! concrete [`FieldType`], following `schema` and `$ref` indirection through
//! the definitions registry (the document root).

use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use super::error::FormError;
use super::types::FieldType;
use crate::domain::definition::ParameterDefinition;

/// A definition after reference resolution
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDefinition {
    pub definition: ParameterDefinition,
    pub field_type: FieldType,
    /// Registry entry the definition was copied from, if any
    pub definition_name: Option<String>,
    /// References followed to reach the definition, outermost first
    pub references: Vec<String>,
}

impl ResolvedDefinition {
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

// ============================================================================
// Resolution Context
// ============================================================================

/// Context for one resolution, carrying the registry and the refs in flight
pub struct ResolutionContext<'a> {
    registry: &'a Value,
    visited_refs: HashSet<String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(registry: &'a Value) -> Self {
        Self {
            registry,
            visited_refs: HashSet::new(),
        }
    }

    /// A context in which `ancestors`, the references already being
    /// expanded around the field, count as in flight
    pub fn with_ancestors<I, S>(registry: &'a Value, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry,
            visited_refs: ancestors.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve a definition into a concrete type.
    ///
    /// Precedence: own `type`, then `schema.type`, then the reference from
    /// `$ref` or `schema.$ref`, then a shape-based guess.
    pub fn resolve(&mut self, param: &ParameterDefinition) -> Result<ResolvedDefinition, FormError> {
        if let Some(type_name) = &param.type_name {
            return Ok(ResolvedDefinition {
                definition: param.clone(),
                field_type: FieldType::parse(type_name),
                definition_name: None,
                references: Vec::new(),
            });
        }

        if let Some(schema) = &param.schema {
            if let Some(type_name) = &schema.type_name {
                let definition = param.clone().overlay(schema);
                return Ok(ResolvedDefinition {
                    field_type: FieldType::parse(type_name),
                    definition,
                    definition_name: None,
                    references: Vec::new(),
                });
            }
        }

        if let Some(reference) = param.reference_path() {
            return self.follow(reference, param);
        }

        Ok(ResolvedDefinition {
            field_type: infer_type(param),
            definition: param.clone(),
            definition_name: None,
            references: Vec::new(),
        })
    }

    fn follow(
        &mut self,
        reference: &str,
        param: &ParameterDefinition,
    ) -> Result<ResolvedDefinition, FormError> {
        if !self.visited_refs.insert(reference.to_string()) {
            return Err(FormError::CircularReference {
                reference: reference.to_string(),
                field: param.name.clone(),
            });
        }

        let missing = || FormError::MissingDefinition {
            reference: reference.to_string(),
            field: param.name.clone(),
        };

        let located = lookup(self.registry, reference).ok_or_else(missing)?;
        let definition: ParameterDefinition =
            serde_json::from_value(located.clone()).map_err(|e| FormError::InvalidDefinition {
                reference: reference.to_string(),
                field: param.name.clone(),
                reason: e.to_string(),
            })?;

        debug!("Resolved '{}' for param '{}'", reference, param.name);

        let copied = ParameterDefinition {
            name: param.name.clone(),
            location: param.location.clone(),
            description: definition.description.clone().or_else(|| param.description.clone()),
            required: definition.required.clone().or_else(|| param.required.clone()),
            ..definition
        };

        let mut resolved = self.resolve(&copied)?;
        if resolved.definition_name.is_none() {
            resolved.definition_name = reference_name(reference);
        }
        resolved.references.insert(0, reference.to_string());
        Ok(resolved)
    }
}

/// Resolve a single definition against a registry
pub fn resolve_definition(
    param: &ParameterDefinition,
    registry: &Value,
) -> Result<ResolvedDefinition, FormError> {
    ResolutionContext::new(registry).resolve(param)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Walk a `#/a/b/c` reference through the registry segment by segment.
///
/// A bare name without any `/` is looked up under `definitions`.
pub fn lookup<'v>(registry: &'v Value, reference: &str) -> Option<&'v Value> {
    if !reference.contains('/') {
        let name = reference.trim_start_matches('#');
        return registry.get("definitions").and_then(|defs| defs.get(name));
    }

    let path = reference.strip_prefix('#').unwrap_or(reference);
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(registry, |node, segment| {
            let key = segment.replace("~1", "/").replace("~0", "~");
            match node {
                Value::Object(map) => map.get(&key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
}

fn reference_name(reference: &str) -> Option<String> {
    reference
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "#")
        .map(|name| name.replace("~1", "/").replace("~0", "~"))
}

/// Guess a type for an untyped definition from its shape
fn infer_type(param: &ParameterDefinition) -> FieldType {
    if param.properties.is_some() {
        FieldType::Object
    } else if param.items.is_some() {
        FieldType::Array
    } else {
        FieldType::Unknown(String::new())
    }
}

// ============================================================================
// Tests
// ============================================================================
