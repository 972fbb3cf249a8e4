//! Swagger document model consumed by form synthesis.
//!
//! Only the parts the form engine reads are typed: `info`, `paths` with
//! their operations, and the raw document root, which doubles as the
//! definitions registry for `$ref` resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::definition::DeclaredParameter;

/// HTTP methods recognised as operations inside a path item
pub const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<DeclaredParameter>,
}

/// Operations declared under one path, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub operations: IndexMap<String, Operation>,
}

#[derive(Debug, Clone, Default)]
pub struct SwaggerDocument {
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    raw: Value,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    info: Info,
    #[serde(default)]
    paths: IndexMap<String, IndexMap<String, Value>>,
}

impl SwaggerDocument {
    /// Load a document from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(DocumentError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        let raw: Value = serde_json::from_str(content)?;
        Self::from_value(raw)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        let raw: Value = serde_yaml::from_str(content)?;
        Self::from_value(raw)
    }

    /// Build the typed view over an already parsed document
    pub fn from_value(raw: Value) -> Result<Self, DocumentError> {
        let parsed: RawDocument = serde_json::from_value(raw.clone())?;

        let mut paths = IndexMap::new();
        for (path, entries) in parsed.paths {
            let shared: Vec<DeclaredParameter> = match entries.get("parameters") {
                Some(value) => serde_json::from_value(value.clone())?,
                None => Vec::new(),
            };

            let mut operations = IndexMap::new();
            for (method, value) in entries {
                let method = method.to_lowercase();
                if !HTTP_METHODS.contains(&method.as_str()) {
                    continue;
                }
                let mut operation: Operation = serde_json::from_value(value)?;
                // Path-level parameters apply unless the operation overrides them by name and location
                for param in &shared {
                    if !operation
                        .parameters
                        .iter()
                        .any(|p| p.name() == param.name() && p.location() == param.location())
                    {
                        operation.parameters.push(param.clone());
                    }
                }
                operations.insert(method, operation);
            }
            paths.insert(path, PathItem { operations });
        }

        Ok(Self {
            info: parsed.info,
            paths,
            raw,
        })
    }

    /// The document root, used as the registry for `$ref` lookups
    pub fn registry(&self) -> &Value {
        &self.raw
    }

    /// Iterate `(method, path, operation)` in document order
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (method.as_str(), path.as_str(), op))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETSTORE: &str = r##"{
        "swagger": "2.0",
        "info": { "title": "Petstore", "version": "1.0.0" },
        "paths": {
            "/pet/{petId}": {
                "parameters": [ { "name": "petId", "in": "path", "required": true, "type": "integer" } ],
                "get": { "tags": ["pet"], "summary": "Find pet by ID" },
                "delete": {
                    "tags": ["pet"],
                    "parameters": [ { "name": "petId", "in": "path", "required": true, "type": "string" } ]
                }
            },
            "/pet": {
                "post": {
                    "tags": ["pet"],
                    "parameters": [ { "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Pet" } } ]
                }
            }
        },
        "definitions": { "Pet": { "type": "object", "properties": { "name": { "type": "string" } } } }
    }"##;

    #[test]
    fn test_parse_operations_in_order() {
        let doc = SwaggerDocument::from_json_str(PETSTORE).unwrap();
        assert_eq!(doc.info.title, "Petstore");
        let ops: Vec<(String, String)> = doc
            .operations()
            .map(|(m, p, _)| (m.to_string(), p.to_string()))
            .collect();
        assert_eq!(
            ops,
            vec![
                ("get".to_string(), "/pet/{petId}".to_string()),
                ("delete".to_string(), "/pet/{petId}".to_string()),
                ("post".to_string(), "/pet".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_level_parameters_merged() {
        let doc = SwaggerDocument::from_json_str(PETSTORE).unwrap();
        let item = &doc.paths["/pet/{petId}"];
        let get = &item.operations["get"];
        assert_eq!(get.parameters.len(), 1);
        assert_eq!(get.parameters[0].parse().unwrap().type_name.as_deref(), Some("integer"));

        // Operation-level parameter with the same name wins
        let delete = &item.operations["delete"];
        assert_eq!(delete.parameters.len(), 1);
        assert_eq!(delete.parameters[0].parse().unwrap().type_name.as_deref(), Some("string"));
    }

    #[test]
    fn test_malformed_parameter_does_not_reject_document() {
        let doc = SwaggerDocument::from_value(serde_json::json!({
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [
                            { "name": "good", "in": "query", "type": "string" },
                            { "name": "bad", "in": "query", "type": "integer",
                              "maximum": 10, "exclusiveMaximum": 9 }
                        ]
                    }
                }
            }
        }))
        .unwrap();

        let get = &doc.paths["/items"].operations["get"];
        assert_eq!(get.parameters.len(), 2);
        assert!(get.parameters[0].parse().is_ok());
        assert!(get.parameters[1].parse().is_err());
    }

    #[test]
    fn test_registry_is_document_root() {
        let doc = SwaggerDocument::from_json_str(PETSTORE).unwrap();
        assert!(doc.registry().pointer("/definitions/Pet").is_some());
    }

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
info:
  title: Tiny
  version: "2"
paths:
  /ping:
    get:
      summary: Ping
"#;
        let doc = SwaggerDocument::from_yaml_str(yaml).unwrap();
        assert_eq!(doc.info.version, "2");
        assert_eq!(doc.operations().count(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "{}").unwrap();
        let err = SwaggerDocument::from_path(&path).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(ext) if ext == "txt"));
    }
}
