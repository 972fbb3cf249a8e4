use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Settings;
use crate::domain::document::SwaggerDocument;
use crate::form::{render_outline, synthesize_document, FormOptions, OperationForm};

/// Swagger Form - build headless input forms from a Swagger document
#[derive(Parser, Debug, Clone)]
#[command(name = "swagger-form", version, about, long_about = None)]
pub struct Cli {
    /// Swagger document (.json, .yaml or .yml)
    #[arg(short, long, env = "SWAGGER_FORM_DOCUMENT")]
    pub document: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, env = "SWAGGER_FORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only this operation: "METHOD /path" or its operationId
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Largest enum rendered as a group of toggles
    #[arg(long, env = "SWAGGER_FORM_MAX_RADIO")]
    pub max_radio: Option<usize>,

    /// Set a field value, e.g. --set body.name=rex
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<Assignment>,

    /// Uncheck the enable toggle of a field
    #[arg(long, value_name = "PATH")]
    pub disable: Vec<String>,

    /// Append one item to an array
    #[arg(long, value_name = "PATH")]
    pub append: Vec<String>,

    /// What to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Outline,
    Values,
    Both,
}

/// A `path=value` pair given on the command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub path: String,
    pub value: String,
}

fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", raw))?;
    if path.trim().is_empty() {
        return Err(format!("missing field path in '{}'", raw));
    }
    Ok(Assignment {
        path: path.trim().to_string(),
        value: value.to_string(),
    })
}

impl Cli {
    /// Whether the form was asked for by `--operation`
    fn selects(&self, form: &OperationForm) -> bool {
        match &self.operation {
            None => true,
            Some(wanted) => {
                form.id.eq_ignore_ascii_case(wanted.trim())
                    || form.operation_id.as_deref() == Some(wanted.as_str())
            }
        }
    }
}

/// Synthesize the document, replay the command line actions and render the
/// requested output
pub fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<String> {
    let document = SwaggerDocument::from_path(&cli.document)
        .with_context(|| format!("Failed to load {}", cli.document.display()))?;
    let options = FormOptions::from_settings(&settings.form, document.registry().clone());

    let forms: Vec<OperationForm> = synthesize_document(&document, options)?
        .into_iter()
        .filter(|form| cli.selects(form))
        .collect();
    if forms.is_empty() {
        return Err(anyhow!(
            "No operation matches '{}'",
            cli.operation.as_deref().unwrap_or_default()
        ));
    }
    info!("Rendering {} form(s)", forms.len());

    for form in &forms {
        apply_actions(cli, form)?;
    }

    let mut out = String::new();
    if cli.format != OutputFormat::Values {
        for form in &forms {
            out.push_str(&render_outline(form));
        }
    }
    if cli.format != OutputFormat::Outline {
        let values: Map<String, Value> = forms
            .iter()
            .map(|form| (form.id.clone(), form.values()))
            .collect();
        out.push_str(&serde_json::to_string_pretty(&Value::Object(values))?);
        out.push('\n');
    }
    Ok(out)
}

/// Appends first so item paths exist, then values, then toggles
fn apply_actions(cli: &Cli, form: &OperationForm) -> anyhow::Result<()> {
    let single = cli.operation.is_some();

    for path in &cli.append {
        match form.array(path) {
            Some(appender) => {
                appender.append()?;
            }
            None if single => return Err(anyhow!("No array '{}' in {}", path, form.id)),
            None => {}
        }
    }

    for assignment in &cli.assignments {
        match form.field(&assignment.path) {
            Some(field) => {
                if !field.set_value(&assignment.value) {
                    warn!(
                        "'{}' is not a valid value for {}",
                        assignment.value, field.id
                    );
                }
            }
            None if single => {
                return Err(anyhow!("No field '{}' in {}", assignment.path, form.id))
            }
            None => {}
        }
    }

    for path in &cli.disable {
        match form.field(path) {
            Some(field) => field.set_enabled(false),
            None if single => return Err(anyhow!("No field '{}' in {}", path, form.id)),
            None => {}
        }
    }

    Ok(())
}
