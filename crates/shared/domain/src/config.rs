use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Default field used to tag and key individual content items.
pub const DEFAULT_CACHE_KEY: &str = "id";
/// Default path of the Strapi GraphQL endpoint, relative to the CMS base URL.
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

/// Top-level configuration of a process embedding the content bridge.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub strapi: StrapiConfig,
    pub log: LogConfig,
}

/// CMS connection and content-type declarations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrapiConfigInner {
    /// Base URL of the CMS, without a trailing slash (e.g. `https://cms.example.com`).
    pub url: String,
    pub graphql_path: String,
    /// Per-request timeout; `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Ordered content-type declarations. Order decides lookup precedence.
    pub types: Vec<ContentTypeConfig>,
    pub rest: RestConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct StrapiConfig {
    #[serde(flatten, default)]
    inner: Arc<StrapiConfigInner>,
}

impl Deref for StrapiConfig {
    type Target = StrapiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for StrapiConfig {
    fn deref_mut(&mut self) -> &mut StrapiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// One content type as declared in configuration.
///
/// `single` types (e.g. a homepage) only ever hold one item; collection types additionally
/// get a collection slot and a keyed static cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeConfig {
    pub name: String,
    #[serde(default)]
    pub single: bool,
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
    #[serde(default = "default_cache_items")]
    pub cache_items: bool,
}

impl ContentTypeConfig {
    /// Declares a collection type with the default cache key.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            single: false,
            cache_key: DEFAULT_CACHE_KEY.to_owned(),
            cache_items: true,
        }
    }

    /// Declares a single type with the default cache key.
    pub fn single(name: impl Into<String>) -> Self {
        Self { single: true, ..Self::collection(name) }
    }

    #[must_use]
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    #[must_use]
    pub const fn with_cache_items(mut self, enabled: bool) -> Self {
        self.cache_items = enabled;
        self
    }
}

/// Settings of the REST fallback path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Fields published with a `_<locale>` suffix that get renamed to their bare name.
    pub localized_fields: Vec<String>,
}

/// Logging bootstrap settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub format: LogFormat,
    /// Optional directive list in `RUST_LOG` syntax, e.g. `scms_store=debug,reqwest=warn`.
    pub filter: Option<String>,
    /// When set, logs are also written to daily-rotated files in this directory.
    pub directory: Option<PathBuf>,
}

/// Console/file output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_owned()
}

const fn default_cache_items() -> bool {
    true
}

// --- Default ---

impl Default for StrapiConfigInner {
    fn default() -> Self {
        Self {
            url: "http://localhost:1337".to_owned(),
            graphql_path: DEFAULT_GRAPHQL_PATH.to_owned(),
            timeout_secs: None,
            types: Vec::new(),
            rest: RestConfig::default(),
        }
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self { localized_fields: vec!["title".to_owned(), "content_zone".to_owned()] }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact, filter: None, directory: None }
    }
}
