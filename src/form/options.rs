//! Options recognised by form synthesis

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::fmt;
use std::rc::Rc;

use super::types::FileHandle;
use crate::config::{DateFormat, FormSettings};

/// Transforms the raw text of a date/datetime control
pub type ValueFormatter = Rc<dyn Fn(&str) -> Value>;

/// Transforms the files selected in a file control
pub type FileFormatter = Rc<dyn Fn(&[FileHandle]) -> Value>;

pub const DEFAULT_MAX_RADIO: usize = 5;
pub const DEFAULT_REQUIRED_TIPS: &str = "This parameter is Required";
pub const DEFAULT_DISABLE_TIPS: &str = "Uncheck to not send the parameter";
pub const DEFAULT_ADD_ITEM_LABEL: &str = "Add Item";

#[derive(Clone)]
pub struct FormOptions {
    /// Largest enum rendered as a toggle group; longer lists become a selection list
    pub max_radio: usize,
    pub required_tips: String,
    pub disable_tips: String,
    pub add_item_label: String,
    pub date_formatter: Option<ValueFormatter>,
    pub date_time_formatter: Option<ValueFormatter>,
    pub file_formatter: Option<FileFormatter>,
    /// Registry walked by `$ref` resolution (the document root)
    pub definitions: Rc<Value>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            max_radio: DEFAULT_MAX_RADIO,
            required_tips: DEFAULT_REQUIRED_TIPS.to_string(),
            disable_tips: DEFAULT_DISABLE_TIPS.to_string(),
            add_item_label: DEFAULT_ADD_ITEM_LABEL.to_string(),
            date_formatter: None,
            date_time_formatter: None,
            file_formatter: None,
            definitions: Rc::new(Value::Null),
        }
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("max_radio", &self.max_radio)
            .field("required_tips", &self.required_tips)
            .field("disable_tips", &self.disable_tips)
            .field("add_item_label", &self.add_item_label)
            .field("date_formatter", &self.date_formatter.is_some())
            .field("date_time_formatter", &self.date_time_formatter.is_some())
            .field("file_formatter", &self.file_formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from loaded settings, resolving `$ref`s against `definitions`
    pub fn from_settings(settings: &FormSettings, definitions: Value) -> Self {
        Self {
            max_radio: settings.max_radio,
            required_tips: settings.required_tips.clone(),
            disable_tips: settings.disable_tips.clone(),
            add_item_label: settings.add_item_label.clone(),
            date_formatter: date_formatter(settings.date_format),
            date_time_formatter: date_time_formatter(settings.date_time_format),
            file_formatter: None,
            definitions: Rc::new(definitions),
        }
    }

    pub fn with_definitions(mut self, definitions: Value) -> Self {
        self.definitions = Rc::new(definitions);
        self
    }

    pub fn with_max_radio(mut self, max_radio: usize) -> Self {
        self.max_radio = max_radio;
        self
    }

    pub fn with_date_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> Value + 'static,
    {
        self.date_formatter = Some(Rc::new(formatter));
        self
    }

    pub fn with_date_time_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> Value + 'static,
    {
        self.date_time_formatter = Some(Rc::new(formatter));
        self
    }

    pub fn with_file_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&[FileHandle]) -> Value + 'static,
    {
        self.file_formatter = Some(Rc::new(formatter));
        self
    }
}

// ============================================================================
// Named Formatters
// ============================================================================

fn date_formatter(format: DateFormat) -> Option<ValueFormatter> {
    let formatter: ValueFormatter = match format {
        DateFormat::Raw => return None,
        DateFormat::Iso => Rc::new(|raw| {
            parse_date(raw)
                .map(|dt| json!(dt.and_utc().to_rfc3339()))
                .unwrap_or(Value::Null)
        }),
        DateFormat::EpochSeconds => Rc::new(|raw| {
            parse_date(raw)
                .map(|dt| json!(dt.and_utc().timestamp()))
                .unwrap_or(Value::Null)
        }),
        DateFormat::EpochMillis => Rc::new(|raw| {
            parse_date(raw)
                .map(|dt| json!(dt.and_utc().timestamp_millis()))
                .unwrap_or(Value::Null)
        }),
    };
    Some(formatter)
}

fn date_time_formatter(format: DateFormat) -> Option<ValueFormatter> {
    let formatter: ValueFormatter = match format {
        DateFormat::Raw => return None,
        DateFormat::Iso => Rc::new(|raw| {
            parse_date_time(raw)
                .map(|dt| json!(dt.and_utc().to_rfc3339()))
                .unwrap_or(Value::Null)
        }),
        DateFormat::EpochSeconds => Rc::new(|raw| {
            parse_date_time(raw)
                .map(|dt| json!(dt.and_utc().timestamp()))
                .unwrap_or(Value::Null)
        }),
        DateFormat::EpochMillis => Rc::new(|raw| {
            parse_date_time(raw)
                .map(|dt| json!(dt.and_utc().timestamp_millis()))
                .unwrap_or(Value::Null)
        }),
    };
    Some(formatter)
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Accepts the `datetime-local` shapes, with or without seconds
fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}
