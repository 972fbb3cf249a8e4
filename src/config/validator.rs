use thiserror::Error;

use crate::config::{FormSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_form(&settings.form) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_form(form: &FormSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if form.max_radio == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "form.max_radio".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let labels = [
            ("form.required_tips", &form.required_tips),
            ("form.disable_tips", &form.disable_tips),
            ("form.add_item_label", &form.add_item_label),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField(field.to_string()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
