//! REST fallback for content that is not exposed through GraphQL.

use crate::common::ErrorHandler;
use parking_lot::RwLock;
use scms_domain::config::RestConfig;
use scms_store::{ContentStore, StoreError};
use scms_transport::{GraphqlClient, QueryTransport};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Fetches a REST resource and keeps the localized result in its own buffer.
///
/// The buffer is not part of any state slice.
pub struct RestContent<T = GraphqlClient> {
    store: ContentStore<T>,
    localized_fields: Arc<[String]>,
    content: Arc<RwLock<Option<Arc<Value>>>>,
    on_error: Option<ErrorHandler>,
}

impl<T> Clone for RestContent<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            localized_fields: Arc::clone(&self.localized_fields),
            content: Arc::clone(&self.content),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> fmt::Debug for RestContent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestContent")
            .field("localized_fields", &self.localized_fields)
            .field("loaded", &self.content.read().is_some())
            .finish_non_exhaustive()
    }
}

impl<T: QueryTransport> RestContent<T> {
    /// Localizes the fields listed in `config`.
    #[must_use]
    pub fn new(store: &ContentStore<T>, config: &RestConfig) -> Self {
        Self::with_fields(store, config.localized_fields.iter().cloned())
    }

    pub fn with_fields<I, S>(store: &ContentStore<T>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store: store.clone(),
            localized_fields: fields.into_iter().map(Into::into).collect(),
            content: Arc::new(RwLock::new(None)),
            on_error: None,
        }
    }

    #[must_use]
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(&StoreError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// GETs `endpoint`, renames `<field>_<locale>` to `<field>` and stores the result.
    ///
    /// # Errors
    /// Returns [`StoreError::Transport`]; the buffer keeps its previous content.
    #[instrument(skip(self))]
    pub async fn fetch(&self, endpoint: &str, locale: &str) -> Result<Arc<Value>, StoreError> {
        let mut value = match self.store.transport().get_json(endpoint).await {
            Ok(value) => value,
            Err(err) => {
                let err = StoreError::from(err);
                match &self.on_error {
                    Some(handler) => handler(&err),
                    None => warn!(error = %err, "Unhandled REST fetch error"),
                }
                return Err(err);
            },
        };

        localize(&mut value, &self.localized_fields, locale);
        info!("REST content fetched");

        let value = Arc::new(value);
        *self.content.write() = Some(Arc::clone(&value));
        Ok(value)
    }

    /// The last successfully fetched content.
    #[must_use]
    pub fn content(&self) -> Option<Arc<Value>> {
        self.content.read().clone()
    }

    /// Absolute URL of a CMS-relative path such as an upload.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        self.store.transport().resolve(path)
    }
}

/// Renames locale-suffixed fields on an object, or on every object of an array.
pub fn localize(value: &mut Value, fields: &[String], locale: &str) {
    if locale.is_empty() {
        return;
    }

    match value {
        Value::Array(items) => {
            for item in items {
                localize_object(item, fields, locale);
            }
        },
        other => localize_object(other, fields, locale),
    }
}

fn localize_object(value: &mut Value, fields: &[String], locale: &str) {
    let Value::Object(map) = value else {
        return;
    };

    for field in fields {
        if let Some(localized) = map.remove(&format!("{field}_{locale}")) {
            map.insert(field.clone(), localized);
        }
    }
}
