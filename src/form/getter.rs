//! Live value accessors.
//!
//! A [`Getter`] is a namespace of accessors keyed by field name. Each
//! accessor reads its control (or container) when called; nothing is cached,
//! so a read always reflects the current display state. Objects nest a fresh
//! namespace; arrays bind their items into a backing namespace and expose a
//! single computed accessor over it.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

use super::types::{PathSegment, PropertyPath};

/// Reads the current value of a field, `None` when the field is absent
pub type ReadFn = Rc<dyn Fn() -> Option<Value>>;

#[derive(Clone)]
pub enum Accessor {
    Computed(ReadFn),
    Nested(Getter),
}

impl Accessor {
    pub fn read(&self) -> Option<Value> {
        match self {
            Accessor::Computed(read) => read(),
            Accessor::Nested(getter) => Some(getter.snapshot()),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Computed(_) => f.write_str("Computed"),
            Accessor::Nested(getter) => f.debug_tuple("Nested").field(getter).finish(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Getter {
    entries: Rc<RefCell<IndexMap<String, Accessor>>>,
}

impl Getter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a computed accessor under `name`
    pub fn define<F>(&self, name: &str, read: F)
    where
        F: Fn() -> Option<Value> + 'static,
    {
        self.insert(name, Accessor::Computed(Rc::new(read)));
    }

    pub(crate) fn define_shared(&self, name: &str, read: ReadFn) {
        self.insert(name, Accessor::Computed(read));
    }

    /// Bind a fresh nested namespace under `name` and return it
    pub fn define_nested(&self, name: &str) -> Getter {
        let nested = Getter::new();
        self.insert(name, Accessor::Nested(nested.clone()));
        nested
    }

    fn insert(&self, name: &str, accessor: Accessor) {
        let previous = self.entries.borrow_mut().insert(name.to_string(), accessor);
        if previous.is_some() {
            warn!("Getter for '{}' was defined twice, keeping the latest", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Bound names in definition order
    pub fn names(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.entries.borrow().get(name).cloned()
    }

    /// Nested namespace bound under `name`, if that entry is an object
    pub fn nested(&self, name: &str) -> Option<Getter> {
        match self.accessor(name)? {
            Accessor::Nested(getter) => Some(getter),
            Accessor::Computed(_) => None,
        }
    }

    /// Current value under `name`; `None` when unbound or absent
    pub fn read(&self, name: &str) -> Option<Value> {
        // Release the borrow before calling out: accessors may read other namespaces
        let accessor = self.accessor(name)?;
        accessor.read()
    }

    /// Read a qualified path such as `body.tags[1]`.
    ///
    /// Walks nested namespaces, then indexes into the JSON value of the first
    /// computed accessor it meets.
    pub fn read_path(&self, path: &PropertyPath) -> Option<Value> {
        let mut segments = path.segments();
        let mut current = self.clone();

        let value = loop {
            let key = match segments.next() {
                Some(PathSegment::Property(name)) => name.clone(),
                Some(PathSegment::Index(idx)) => idx.to_string(),
                None => return Some(current.snapshot()),
            };
            match current.accessor(&key)? {
                Accessor::Nested(getter) => current = getter,
                Accessor::Computed(read) => break read()?,
            }
        };

        segments.try_fold(value, |value, segment| match segment {
            PathSegment::Property(name) => value.get(name).cloned(),
            PathSegment::Index(idx) => value.get(*idx).cloned(),
        })
    }

    /// Values in definition order, absent entries kept as `None`
    pub fn values(&self) -> Vec<Option<Value>> {
        let accessors: Vec<Accessor> = self.entries.borrow().values().cloned().collect();
        accessors.iter().map(Accessor::read).collect()
    }

    /// Read everything into a JSON object, omitting absent entries
    pub fn snapshot(&self) -> Value {
        let accessors: Vec<(String, Accessor)> = self
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut obj = Map::new();
        for (name, accessor) in accessors {
            if let Some(value) = accessor.read() {
                obj.insert(name, value);
            }
        }
        Value::Object(obj)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
