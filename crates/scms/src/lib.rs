//! Facade crate for the Strapi content integration.
//! Re-exports the shared and feature crates and wires them into one [`Strapi`] context.
//! Keep this crate thin: it composes other crates, it does not implement content logic.
//!
//! ## Usage
//! ```rust,no_run
//! use scms::binding::{BindingOptions, QuerySpec};
//! use scms::domain::ViewContext;
//! use scms::domain::config::{ContentTypeConfig, StrapiConfig};
//! use scms::Strapi;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = StrapiConfig::default();
//! config.types.push(ContentTypeConfig::collection("article"));
//!
//! let strapi = Strapi::from_config(&config)?;
//! let article = strapi.item("article", BindingOptions::default(), |view: &ViewContext| {
//!     QuerySpec::new("query($path: String!) { articles(where: {path: $path}) { title } }")
//!         .variables(serde_json::json!({ "path": view.route() }))
//! })?;
//!
//! article.mount(&ViewContext::at("/blog/hello")).await?;
//! println!("{:?}", article.snapshot());
//! # Ok(())
//! # }
//! ```

mod error;
mod strapi;

pub use error::{StrapiError, StrapiErrorExt};
pub use scms_binding as binding;
pub use scms_domain as domain;
pub use scms_kernel as kernel;
pub use scms_registry as registry;
pub use scms_store as store;
pub use scms_transport as transport;
pub use strapi::{Strapi, StrapiBuilder, StrapiInner};

use scms_domain::config::AppConfig;
use std::path::Path;

/// Loads the application configuration from `path` (or `scms.*` in the working directory)
/// with `SCMS__` environment overrides.
///
/// # Errors
/// Returns [`StrapiError::Config`] when the file is missing or malformed.
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, StrapiError> {
    scms_kernel::config::load_config(path).context("Loading application config")
}
