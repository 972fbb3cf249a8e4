//! Array containers and the append affordance.
//!
//! Items bind into a backing namespace keyed by their index; the array's
//! own getter entry reads that namespace on every access, so appended items
//! show up without rebinding anything. Items are never removed.

use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

use super::error::FormError;
use super::generator::{synthesize_field, FieldNode, Scope};
use super::getter::Getter;
use super::resolver::ResolvedDefinition;
use super::types::PropertyPath;
use crate::domain::definition::{value_to_display, CollectionFormat, ParameterDefinition};

const DEFAULT_MIN_ITEMS: u64 = 1;

/// Grouping element for an array's items
#[derive(Clone, Debug)]
pub struct ArrayContainer {
    pub id: String,
    pub path: PropertyPath,
    pub legend: String,
    pub description: Option<String>,
    pub collection_format: Option<CollectionFormat>,
    /// Declared upper bound, exposed as a hint only
    pub max_items: Option<u64>,
    pub appender: ArrayAppender,
}

impl ArrayContainer {
    /// Item subtrees in index order
    pub fn items(&self) -> Vec<FieldNode> {
        self.appender.inner.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.appender.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) struct AppenderInner {
    scope: Scope,
    item: ParameterDefinition,
    path: PropertyPath,
    backing: Getter,
    items: RefCell<Vec<FieldNode>>,
    max_items: Option<u64>,
    label: String,
}

/// The "add item" affordance of one array.
///
/// Each call to [`ArrayAppender::append`] builds exactly one new item
/// subtree at the next index.
#[derive(Clone)]
pub struct ArrayAppender {
    inner: Rc<AppenderInner>,
}

impl std::fmt::Debug for ArrayAppender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayAppender")
            .field("path", &self.inner.path.to_string())
            .field("len", &self.len())
            .field("label", &self.inner.label)
            .finish()
    }
}

impl ArrayAppender {
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn path(&self) -> &PropertyPath {
        &self.inner.path
    }

    /// Number of items built so far
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the next item and return its index
    pub fn append(&self) -> Result<usize, FormError> {
        let inner = &self.inner;
        // The index only counts once the item is pushed; a failed build leaves no gap
        let index = self.len();

        let item = inner.item.renamed(index.to_string());
        let node = synthesize_field(
            &inner.scope,
            &item,
            &inner.backing,
            &inner.path.push_index(index),
            false,
        )?;
        inner.items.borrow_mut().push(node);

        if let Some(max) = inner.max_items {
            if index as u64 >= max {
                warn!(
                    "Array '{}' now has {} items, above its maxItems of {}",
                    inner.path,
                    index + 1,
                    max
                );
            }
        }
        debug!("Appended item {} to '{}'", index, inner.path);
        Ok(index)
    }

    pub(crate) fn downgrade(&self) -> Weak<AppenderInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<AppenderInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}

/// Build an array container, binding its reader under the field name and
/// eagerly rendering `minItems` items (default 1).
pub(crate) fn build_array(
    scope: &Scope,
    resolved: &ResolvedDefinition,
    getter: &Getter,
    path: &PropertyPath,
) -> Result<FieldNode, FormError> {
    let definition = &resolved.definition;
    let id = scope.identifier(path);
    let item = item_definition(definition);

    let backing = Getter::new();
    let collection_format = definition.collection_format;
    let reader_backing = backing.clone();
    getter.define(&definition.name, move || {
        Some(format_collection(reader_backing.values(), collection_format))
    });

    let appender = ArrayAppender {
        inner: Rc::new(AppenderInner {
            scope: scope.clone(),
            item,
            path: path.clone(),
            backing,
            items: RefCell::new(Vec::new()),
            max_items: definition.max_items,
            label: scope.options().add_item_label.clone(),
        }),
    };
    scope.index().register_array(&id, path, &appender);

    for _ in 0..definition.min_items.unwrap_or(DEFAULT_MIN_ITEMS) {
        appender.append()?;
    }

    Ok(FieldNode::Array(ArrayContainer {
        id,
        path: path.clone(),
        legend: definition.name.clone(),
        description: definition.description.clone(),
        collection_format,
        max_items: definition.max_items,
        appender,
    }))
}

/// Item definition of an array, defaulting to a string when the items
/// declare neither a type nor a reference
fn item_definition(definition: &ParameterDefinition) -> ParameterDefinition {
    match definition.item_definition() {
        Some(items) if items.is_typed() => items.clone(),
        declared => {
            warn!(
                "This '{}' array should have defined items, defaulting to string",
                definition.name
            );
            let mut items = declared.cloned().unwrap_or_default();
            items.type_name = Some("string".to_string());
            items
        }
    }
}

/// Collapse item values according to `collectionFormat`.
///
/// Joined formats render absent items as empty strings; the raw sequence
/// keeps them as `null`.
pub fn format_collection(values: Vec<Option<Value>>, format: Option<CollectionFormat>) -> Value {
    let display = |value: &Option<Value>| value.as_ref().map(value_to_display).unwrap_or_default();

    match format {
        Some(CollectionFormat::Multi) => Value::Array(
            values
                .iter()
                .map(|v| Value::String(urlencoding::encode(&display(v)).into_owned()))
                .collect(),
        ),
        Some(format) => match format.separator() {
            Some(separator) => Value::String(values.iter().map(display).collect::<Vec<_>>().join(separator)),
            None => raw_sequence(values),
        },
        None => raw_sequence(values),
    }
}

fn raw_sequence(values: Vec<Option<Value>>) -> Value {
    Value::Array(values.into_iter().map(|v| v.unwrap_or(Value::Null)).collect())
}
