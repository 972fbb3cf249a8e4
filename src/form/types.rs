//! Core types for form synthesis

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Property Path
// ============================================================================

/// Segment of a property path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
}

/// Qualified location of a field inside a form (e.g. "body.tags[0].name").
///
/// Paths are values: extending one returns a new path, so a recursive call
/// can never leak its segment into a sibling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Push a property segment
    pub fn push_property(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Property(name.to_string()));
        new
    }

    /// Push an array index segment
    pub fn push_index(&self, idx: usize) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Index(idx));
        new
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Path without the last segment
    pub fn parent(&self) -> Self {
        let mut new = self.clone();
        new.segments.pop();
        new
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Parse "user.address[0].city" into a path
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    let mut index_str = String::new();
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                        index_str.push(c);
                    }
                    if let Ok(idx) = index_str.parse::<usize>() {
                        segments.push(PathSegment::Index(idx));
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Field Types
// ============================================================================

/// Resolved type of a field, parsed from the declared type string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Long,
    Float,
    Double,
    String,
    Byte,
    Binary,
    Boolean,
    Date,
    DateTime,
    Password,
    File,
    Object,
    Array,
    // HTML / JS flavoured aliases found in hand-written documents
    Number,
    Text,
    Time,
    DateTimeLocal,
    Unknown(String),
}

impl FieldType {
    /// Parse a declared type, case-insensitively
    pub fn parse(type_name: &str) -> Self {
        match type_name.to_lowercase().as_str() {
            "integer" => FieldType::Integer,
            "long" => FieldType::Long,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "string" => FieldType::String,
            "byte" => FieldType::Byte,
            "binary" => FieldType::Binary,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "password" => FieldType::Password,
            "file" => FieldType::File,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            "number" => FieldType::Number,
            "text" => FieldType::Text,
            "time" => FieldType::Time,
            "datetime-local" => FieldType::DateTimeLocal,
            other => FieldType::Unknown(other.to_string()),
        }
    }

    /// The construction strategy for this type, `None` when unknown
    pub fn widget(&self) -> Option<WidgetKind> {
        let kind = match self {
            FieldType::Integer | FieldType::Long | FieldType::Float | FieldType::Double => {
                WidgetKind::Number
            }
            FieldType::String | FieldType::Byte | FieldType::Binary => WidgetKind::String,
            FieldType::Boolean => WidgetKind::Boolean,
            FieldType::Date => WidgetKind::Date,
            FieldType::DateTime => WidgetKind::DateTime,
            FieldType::Password => WidgetKind::Password,
            FieldType::File => WidgetKind::File,
            FieldType::Object => WidgetKind::Object,
            FieldType::Array => WidgetKind::Array,
            FieldType::Number => WidgetKind::Number,
            FieldType::Text | FieldType::Time => WidgetKind::String,
            FieldType::DateTimeLocal => WidgetKind::DateTime,
            FieldType::Unknown(_) => return None,
        };
        Some(kind)
    }

    /// Whether this is one of the aliases outside the Swagger type list
    pub fn is_alias(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Text | FieldType::Time | FieldType::DateTimeLocal
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Byte => "byte",
            FieldType::Binary => "binary",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Password => "password",
            FieldType::File => "file",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::Time => "time",
            FieldType::DateTimeLocal => "datetime-local",
            FieldType::Unknown(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction strategy selected for a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Number,
    String,
    Boolean,
    Date,
    DateTime,
    Password,
    File,
    Object,
    Array,
}

impl WidgetKind {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, WidgetKind::Object | WidgetKind::Array)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Number => "number",
            WidgetKind::String => "string",
            WidgetKind::Boolean => "boolean",
            WidgetKind::Date => "date",
            WidgetKind::DateTime => "datetime",
            WidgetKind::Password => "password",
            WidgetKind::File => "file",
            WidgetKind::Object => "object",
            WidgetKind::Array => "array",
        }
    }
}

// ============================================================================
// File Handles
// ============================================================================

/// A file selected in a file control
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileHandle {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
