//! # Swagger Form - schema-driven input forms
//!
//! Builds headless input forms from the parameter definitions of a Swagger
//! document and reads the entered values back through a live getter.
//!
//! ## Features
//!
//! - **Reference resolution**: `$ref` and `schema.$ref` against the document's definitions
//! - **Nested containers**: objects and arrays of any depth, path-qualified identifiers
//! - **Enums**: toggle groups for short lists, selection lists for long ones
//! - **Enablement**: every optional scalar can be switched off and reads as absent
//! - **Arrays**: `minItems` rendered up front, append on demand, `collectionFormat` encoding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swagger_form::config::Settings;
//! use swagger_form::domain::document::SwaggerDocument;
//! use swagger_form::form::{render_outline, synthesize_document, FormOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let document = SwaggerDocument::from_path("petstore.json")?;
//!     let options = FormOptions::from_settings(&settings.form, document.registry().clone());
//!
//!     for form in synthesize_document(&document, options)? {
//!         print!("{}", render_outline(&form));
//!         println!("{}", form.values());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: serde models of the document and its parameter definitions
//! - **Form**: resolution, synthesis, controls, getters
//! - **Config**: layered settings turned into form options
//! - **CLI**: drives forms from a terminal

pub mod cli;
pub mod config;
pub mod domain;
pub mod form;

pub use domain::document::SwaggerDocument;
pub use form::{synthesize_document, synthesize_operation, FormError, FormOptions, OperationForm};
