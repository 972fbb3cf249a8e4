//! Headless input controls.
//!
//! A [`Control`] models one interactive input element: its kind, raw value,
//! checked flag, selected files and disabled flag, plus the constraint hints
//! the schema declared. Controls are shared handles; the getter closures and
//! the enable toggle hold clones of the same handle as the form tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::types::FileHandle;

/// Physical kind of an input element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Text,
    Number,
    Checkbox,
    Date,
    DateTimeLocal,
    Password,
    File,
    Select,
    Radio,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Text => "text",
            ControlKind::Number => "number",
            ControlKind::Checkbox => "checkbox",
            ControlKind::Date => "date",
            ControlKind::DateTimeLocal => "datetime-local",
            ControlKind::Password => "password",
            ControlKind::File => "file",
            ControlKind::Select => "select",
            ControlKind::Radio => "radio",
        }
    }

    /// Kinds whose state lives in the checked flag rather than the text value
    pub fn is_toggle(&self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared constraints exposed to the control as hints
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintHints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

impl ConstraintHints {
    pub fn is_empty(&self) -> bool {
        *self == ConstraintHints::default()
    }
}

/// Display state owned by a control
#[derive(Clone, Debug, PartialEq)]
pub struct ControlState {
    pub id: String,
    /// Group name shared by the toggles of one toggle group
    pub group: Option<String>,
    pub kind: ControlKind,
    pub value: String,
    pub checked: bool,
    pub files: Vec<FileHandle>,
    pub disabled: bool,
    pub required: bool,
    pub placeholder: String,
    pub hints: ConstraintHints,
    /// Entries of a selection list
    pub options: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Control {
    state: Rc<RefCell<ControlState>>,
}

impl Control {
    pub(crate) fn new(id: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            state: Rc::new(RefCell::new(ControlState {
                id: id.into(),
                group: None,
                kind,
                value: String::new(),
                checked: false,
                files: Vec::new(),
                disabled: false,
                required: false,
                placeholder: String::new(),
                hints: ConstraintHints::default(),
                options: Vec::new(),
            })),
        }
    }

    pub(crate) fn with_required(self, required: bool) -> Self {
        self.state.borrow_mut().required = required;
        self
    }

    pub(crate) fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.state.borrow_mut().placeholder = placeholder.into();
        self
    }

    pub(crate) fn with_hints(self, hints: ConstraintHints) -> Self {
        self.state.borrow_mut().hints = hints;
        self
    }

    pub(crate) fn with_group(self, group: impl Into<String>) -> Self {
        self.state.borrow_mut().group = Some(group.into());
        self
    }

    pub(crate) fn with_options(self, options: Vec<String>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.value = options.first().cloned().unwrap_or_default();
            state.options = options;
        }
        self
    }

    pub(crate) fn with_value(self, value: impl Into<String>) -> Self {
        self.state.borrow_mut().value = value.into();
        self
    }

    pub fn id(&self) -> String {
        self.state.borrow().id.clone()
    }

    pub fn kind(&self) -> ControlKind {
        self.state.borrow().kind
    }

    pub fn group(&self) -> Option<String> {
        self.state.borrow().group.clone()
    }

    /// Raw text value (for a radio: the value it stands for)
    pub fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.state.borrow_mut().value = value.into();
    }

    pub fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    pub fn set_checked(&self, checked: bool) {
        self.state.borrow_mut().checked = checked;
    }

    pub fn files(&self) -> Vec<FileHandle> {
        self.state.borrow().files.clone()
    }

    pub fn set_files(&self, files: Vec<FileHandle>) {
        self.state.borrow_mut().files = files;
    }

    /// Pick an entry of a selection list. Returns false for values not offered.
    pub fn select(&self, value: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.options.iter().any(|o| o == value) {
            return false;
        }
        state.value = value.to_string();
        true
    }

    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    pub(crate) fn set_disabled(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    pub fn is_required(&self) -> bool {
        self.state.borrow().required
    }

    pub fn placeholder(&self) -> String {
        self.state.borrow().placeholder.clone()
    }

    pub fn hints(&self) -> ConstraintHints {
        self.state.borrow().hints.clone()
    }

    pub fn options(&self) -> Vec<String> {
        self.state.borrow().options.clone()
    }

    /// Copy of the full display state
    pub fn snapshot(&self) -> ControlState {
        self.state.borrow().clone()
    }
}
