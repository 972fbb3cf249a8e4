//! Scalar field strategies.
//!
//! Each strategy creates the physical control(s) for one leaf field, applies
//! the declared constraints as hints and returns a reader for the getter.
//! Every reader reports absence while the field is disabled.

use serde_json::{json, Number, Value};
use std::rc::Rc;
use tracing::warn;

use super::control::{ConstraintHints, Control, ControlKind};
use super::enum_field::{build_enum, EnumWidget};
use super::error::FormError;
use super::getter::ReadFn;
use super::options::{FormOptions, ValueFormatter};
use super::types::{FileHandle, WidgetKind};
use crate::domain::definition::ParameterDefinition;

const STRING_PLACEHOLDER: &str = "lorem ipsum";
const NUMBER_PLACEHOLDER: &str = "0";

/// The physical input(s) behind a scalar field
#[derive(Clone, Debug)]
pub enum ScalarInput {
    Control(Control),
    Enum(EnumWidget),
}

impl ScalarInput {
    pub fn controls(&self) -> Vec<Control> {
        match self {
            ScalarInput::Control(control) => vec![control.clone()],
            ScalarInput::Enum(widget) => widget.controls(),
        }
    }

    /// Kind of the first physical control
    pub fn kind(&self) -> ControlKind {
        match self {
            ScalarInput::Control(control) => control.kind(),
            ScalarInput::Enum(EnumWidget::List(_)) => ControlKind::Select,
            ScalarInput::Enum(EnumWidget::Toggles(_)) => ControlKind::Radio,
        }
    }
}

pub(crate) struct BuiltInput {
    pub input: ScalarInput,
    pub reader: ReadFn,
}

/// Build the input for a scalar strategy
pub(crate) fn build_scalar(
    kind: WidgetKind,
    id: &str,
    definition: &ParameterDefinition,
    required: bool,
    options: &FormOptions,
) -> Result<BuiltInput, FormError> {
    let built = match kind {
        WidgetKind::Number => number_input(id, definition, required),
        WidgetKind::String => return string_input(id, definition, required, options),
        WidgetKind::Boolean => boolean_input(id, definition, required),
        WidgetKind::Date => date_input(id, definition, required, options),
        WidgetKind::DateTime => date_time_input(id, definition, required, options),
        WidgetKind::Password => password_input(id, definition, required),
        WidgetKind::File => file_input(id, definition, required, options),
        WidgetKind::Object | WidgetKind::Array => {
            return Err(FormError::UnknownType {
                type_name: kind.as_str().to_string(),
                field: definition.name.clone(),
            })
        }
    };
    Ok(built)
}

/// Control carrying the `example` as placeholder, or `fallback` when there is none
fn base_control(
    id: &str,
    kind: ControlKind,
    definition: &ParameterDefinition,
    required: bool,
    fallback: &str,
) -> Control {
    let example = definition.example_text();
    let placeholder = if example.is_empty() { fallback.to_string() } else { example };
    Control::new(id, kind)
        .with_required(required)
        .with_placeholder(placeholder)
}

fn single(control: Control, reader: ReadFn) -> BuiltInput {
    BuiltInput {
        input: ScalarInput::Control(control),
        reader,
    }
}

// ============================================================================
// Strategies
// ============================================================================

fn number_input(id: &str, definition: &ParameterDefinition, required: bool) -> BuiltInput {
    let control = base_control(id, ControlKind::Number, definition, required, NUMBER_PLACEHOLDER)
        .with_hints(number_hints(definition));

    let input = control.clone();
    single(
        control,
        Rc::new(move || {
            if input.is_disabled() {
                None
            } else {
                Some(parse_number(&input.value()))
            }
        }),
    )
}

fn string_input(
    id: &str,
    definition: &ParameterDefinition,
    required: bool,
    options: &FormOptions,
) -> Result<BuiltInput, FormError> {
    match &definition.enum_values {
        Some(values) if !values.is_empty() => {
            let (widget, reader) = build_enum(id, definition, required, options)?;
            return Ok(BuiltInput {
                input: ScalarInput::Enum(widget),
                reader,
            });
        }
        Some(_) => warn!("Empty enum for param '{}', using a text input", definition.name),
        None => {}
    }

    match definition.format.as_deref() {
        Some("date") => return Ok(date_input(id, definition, required, options)),
        Some("date-time") => return Ok(date_time_input(id, definition, required, options)),
        _ => {}
    }

    let control = base_control(id, ControlKind::Text, definition, required, STRING_PLACEHOLDER)
        .with_hints(ConstraintHints {
            min_length: definition.min_length,
            max_length: definition.max_length,
            pattern: definition.pattern.clone(),
            ..Default::default()
        });

    Ok(text_reader(control))
}

fn boolean_input(id: &str, definition: &ParameterDefinition, required: bool) -> BuiltInput {
    let control = base_control(id, ControlKind::Checkbox, definition, required, "");
    let input = control.clone();
    single(
        control,
        Rc::new(move || {
            if input.is_disabled() {
                None
            } else {
                Some(Value::Bool(input.is_checked()))
            }
        }),
    )
}

fn date_input(id: &str, definition: &ParameterDefinition, required: bool, options: &FormOptions) -> BuiltInput {
    let control = base_control(id, ControlKind::Date, definition, required, "");
    formatted_reader(control, options.date_formatter.clone())
}

fn date_time_input(
    id: &str,
    definition: &ParameterDefinition,
    required: bool,
    options: &FormOptions,
) -> BuiltInput {
    let control = base_control(id, ControlKind::DateTimeLocal, definition, required, "");
    formatted_reader(control, options.date_time_formatter.clone())
}

fn password_input(id: &str, definition: &ParameterDefinition, required: bool) -> BuiltInput {
    text_reader(base_control(id, ControlKind::Password, definition, required, ""))
}

fn file_input(id: &str, definition: &ParameterDefinition, required: bool, options: &FormOptions) -> BuiltInput {
    let control = base_control(id, ControlKind::File, definition, required, "");
    let formatter = options.file_formatter.clone();
    let input = control.clone();
    single(
        control,
        Rc::new(move || {
            if input.is_disabled() {
                return None;
            }
            let files = input.files();
            Some(match &formatter {
                Some(format) => format(&files),
                None => Value::String(files.first().map(|f| f.name.clone()).unwrap_or_default()),
            })
        }),
    )
}

fn text_reader(control: Control) -> BuiltInput {
    let input = control.clone();
    single(
        control,
        Rc::new(move || {
            if input.is_disabled() {
                None
            } else {
                Some(Value::String(input.value()))
            }
        }),
    )
}

fn formatted_reader(control: Control, formatter: Option<ValueFormatter>) -> BuiltInput {
    let input = control.clone();
    single(
        control,
        Rc::new(move || {
            if input.is_disabled() {
                return None;
            }
            let raw = input.value();
            Some(match &formatter {
                Some(format) => format(&raw),
                None => Value::String(raw),
            })
        }),
    )
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Bounds exposed on a number control; exclusive bounds move one step inward
fn number_hints(definition: &ParameterDefinition) -> ConstraintHints {
    let exclusive_max = definition.exclusive_maximum.unwrap_or(false);
    let exclusive_min = definition.exclusive_minimum.unwrap_or(false);
    ConstraintHints {
        max: definition.maximum.map(|max| if exclusive_max { max - 1.0 } else { max }),
        min: definition.minimum.map(|min| if exclusive_min { min + 1.0 } else { min }),
        ..Default::default()
    }
}

/// Numeric reading of a raw text value.
///
/// Empty text reads as `0`; text that is not a number reads as `null`.
/// Integral values are reported as integers.
pub fn parse_number(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return json!(0);
    }
    let Ok(parsed) = raw.parse::<f64>() else {
        return Value::Null;
    };
    if !parsed.is_finite() {
        return Value::Null;
    }
    if parsed.fract() == 0.0 && parsed.abs() < i64::MAX as f64 {
        return json!(parsed as i64);
    }
    Number::from_f64(parsed).map(Value::Number).unwrap_or(Value::Null)
}

/// Split a comma separated list of file names into handles
pub fn file_handles(raw: &str) -> Vec<FileHandle> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(FileHandle::named)
        .collect()
}
