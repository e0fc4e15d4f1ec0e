use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment prefix for overrides, e.g. `SCMS__STRAPI__URL`.
pub const ENV_PREFIX: &str = "SCMS";
/// File stem looked up when no explicit path is given (`scms.toml`, `scms.yaml`, ...).
pub const DEFAULT_CONFIG_STEM: &str = "scms";

/// Custom error type for config loading.
#[scms_derive::scms_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layering:
/// 1. **Base File**: settings from a file (e.g. `scms.toml`). Defaults to [`DEFAULT_CONFIG_STEM`]
///    in the current working directory; the extension is optional.
/// 2. **Environment Overrides**: variables prefixed with `SCMS__`. Nested structures use double
///    underscores (e.g. `SCMS__STRAPI__URL` maps to `strapi.url`).
///
/// # Errors
/// Returns an error if the file cannot be found, or if the merged sources do not match `T`.
///
/// # Example
/// ```rust
/// use scms_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_STEM), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("strapi.rest.localized_fields")
                .try_parsing(true),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
