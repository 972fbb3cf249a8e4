//! Enumerated values: a group of exclusive toggles for short lists, a
//! selection list for long ones.

use serde_json::Value;
use std::rc::Rc;

use super::control::{Control, ControlKind};
use super::error::FormError;
use super::getter::ReadFn;
use super::options::FormOptions;
use crate::domain::definition::ParameterDefinition;

/// Exclusive toggles sharing one group id
#[derive(Clone, Debug)]
pub struct RadioGroup {
    group: String,
    toggles: Vec<Control>,
}

impl RadioGroup {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn toggles(&self) -> &[Control] {
        &self.toggles
    }

    /// Activate the toggle standing for `value`, deactivating the rest
    pub fn choose(&self, value: &str) -> bool {
        if !self.toggles.iter().any(|t| t.value() == value) {
            return false;
        }
        for toggle in &self.toggles {
            toggle.set_checked(toggle.value() == value);
        }
        true
    }

    pub fn active_value(&self) -> Option<String> {
        self.toggles.iter().find(|t| t.is_checked()).map(Control::value)
    }
}

#[derive(Clone, Debug)]
pub enum EnumWidget {
    List(Control),
    Toggles(RadioGroup),
}

impl EnumWidget {
    /// Pick `value`; false when it is not one of the declared values
    pub fn select(&self, value: &str) -> bool {
        match self {
            EnumWidget::List(control) => control.select(value),
            EnumWidget::Toggles(group) => group.choose(value),
        }
    }

    /// Currently picked value, regardless of enablement
    pub fn current(&self) -> Option<String> {
        match self {
            EnumWidget::List(control) => Some(control.value()),
            EnumWidget::Toggles(group) => group.active_value(),
        }
    }

    pub fn controls(&self) -> Vec<Control> {
        match self {
            EnumWidget::List(control) => vec![control.clone()],
            EnumWidget::Toggles(group) => group.toggles.clone(),
        }
    }

    pub fn is_toggle_group(&self) -> bool {
        matches!(self, EnumWidget::Toggles(_))
    }
}

/// Build the enum widget for `id` and its reader.
///
/// Callers only get here with a declared value list; an empty one is a
/// contract violation and is returned rather than rendered.
pub(crate) fn build_enum(
    id: &str,
    definition: &ParameterDefinition,
    required: bool,
    options: &FormOptions,
) -> Result<(EnumWidget, ReadFn), FormError> {
    let values = definition.enum_strings();
    if values.is_empty() {
        return Err(FormError::MissingEnumList {
            field: definition.name.clone(),
        });
    }

    if values.len() > options.max_radio {
        let select = Control::new(id, ControlKind::Select)
            .with_required(required)
            .with_options(values);
        let widget = EnumWidget::List(select.clone());
        let reader: ReadFn = Rc::new(move || {
            if select.is_disabled() {
                None
            } else {
                Some(Value::String(select.value()))
            }
        });
        return Ok((widget, reader));
    }

    let toggles: Vec<Control> = values
        .iter()
        .map(|value| {
            Control::new(format!("{}:{}", id, value), ControlKind::Radio)
                .with_group(id)
                .with_required(required)
                .with_value(value.as_str())
        })
        .collect();
    if let Some(first) = toggles.first() {
        first.set_checked(true);
    }

    let group = RadioGroup {
        group: id.to_string(),
        toggles,
    };
    let widget = EnumWidget::Toggles(group.clone());
    let reader: ReadFn = Rc::new(move || {
        let first = group.toggles.first()?;
        if first.is_disabled() {
            return None;
        }
        group.active_value().map(Value::String)
    });
    Ok((widget, reader))
}
