use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::form::options::{
    DEFAULT_ADD_ITEM_LABEL, DEFAULT_DISABLE_TIPS, DEFAULT_MAX_RADIO, DEFAULT_REQUIRED_TIPS,
};

/// Base name of the settings file looked up when no `--config` is given
pub const DEFAULT_CONFIG_NAME: &str = "swagger-form";

/// Prefix of environment overrides, e.g. `SWAGGER_FORM_FORM__MAX_RADIO`
pub const ENV_PREFIX: &str = "SWAGGER_FORM";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub form: FormSettings,
}

/// Named transform applied to date and datetime values when read
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// The control text as entered
    #[default]
    Raw,
    /// RFC 3339 string
    #[serde(alias = "rfc3339")]
    Iso,
    EpochSeconds,
    EpochMillis,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormSettings {
    pub max_radio: usize,
    pub required_tips: String,
    pub disable_tips: String,
    pub add_item_label: String,
    pub date_format: DateFormat,
    pub date_time_format: DateFormat,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            max_radio: DEFAULT_MAX_RADIO,
            required_tips: DEFAULT_REQUIRED_TIPS.to_string(),
            disable_tips: DEFAULT_DISABLE_TIPS.to_string(),
            add_item_label: DEFAULT_ADD_ITEM_LABEL.to_string(),
            date_format: DateFormat::Raw,
            date_time_format: DateFormat::Raw,
        }
    }
}

impl Settings {
    /// Settings from `swagger-form.{toml,yaml,json}` in the working directory
    /// and the environment
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::load(Path::new(DEFAULT_CONFIG_NAME), ENV_PREFIX)
    }

    /// Settings from an explicit file and the environment
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        Self::load(path.as_ref(), ENV_PREFIX)
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_NAME.into());
        let mut settings = Self::build(&config_path, ENV_PREFIX)?;

        // Apply CLI overrides (CLI > env vars > config file)
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Settings from `path` with environment overrides under `env_prefix`
    pub fn load(path: &Path, env_prefix: &str) -> Result<Self, anyhow::Error> {
        let settings = Self::build(path, env_prefix)?;
        settings.validate()?;
        Ok(settings)
    }

    fn build(path: &Path, env_prefix: &str) -> Result<Self, anyhow::Error> {
        let defaults = FormSettings::default();
        let s = Config::builder()
            .set_default("form.max_radio", defaults.max_radio as u64)?
            .set_default("form.required_tips", defaults.required_tips)?
            .set_default("form.disable_tips", defaults.disable_tips)?
            .set_default("form.add_item_label", defaults.add_item_label)?
            .set_default("form.date_format", "raw")?
            .set_default("form.date_time_format", "raw")?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(max_radio) = cli.max_radio {
            self.form.max_radio = max_radio;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }
}
