use crate::common::{BindingCore, ErrorHandler};
use crate::options::{BindingOptions, FetchOutcome, QuerySpec};
use parking_lot::RwLock;
use scms_domain::{PersistenceKey, SliceCapabilities, ViewContext};
use scms_store::{ContentStore, SliceHandle, StoreError};
use scms_transport::{GraphqlClient, QueryTransport};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Binds a view to one entry of a content type's static cache.
///
/// The entry is chosen by the binding's persistence key, which must resolve to a non-empty
/// value. The binding keeps the entry it last showed; cached entries are reused without a
/// request unless a fetch is forced.
pub struct StaticBinding<T = GraphqlClient> {
    slice: SliceHandle<T>,
    core: BindingCore,
    current: Arc<RwLock<Option<Arc<Value>>>>,
}

impl<T> Clone for StaticBinding<T> {
    fn clone(&self) -> Self {
        Self {
            slice: self.slice.clone(),
            core: self.core.clone(),
            current: Arc::clone(&self.current),
        }
    }
}

impl<T> fmt::Debug for StaticBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticBinding")
            .field("slice", &self.slice)
            .field("core", &self.core)
            .field("showing", &self.current.read().is_some())
            .finish()
    }
}

impl<T: QueryTransport> StaticBinding<T> {
    /// # Errors
    /// Returns [`StoreError::Configuration`] for unknown or single content types.
    pub fn new<F>(
        store: &ContentStore<T>,
        type_name: &str,
        options: BindingOptions,
        source: F,
    ) -> Result<Self, StoreError>
    where
        F: Fn(&ViewContext) -> QuerySpec + Send + Sync + 'static,
    {
        let slice = store.slice(type_name)?;
        slice.descriptor().ensure(SliceCapabilities::STATIC)?;
        Ok(Self {
            slice,
            core: BindingCore::new(options, Arc::new(source)),
            current: Arc::new(RwLock::new(None)),
        })
    }

    #[must_use]
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(&StoreError) + Send + Sync + 'static,
    {
        self.core.set_error_handler(Arc::new(handler) as ErrorHandler);
        self
    }

    /// The key of this view's static entry.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] when the key resolves to an empty value.
    pub fn persistence_key(&self, view: &ViewContext) -> Result<PersistenceKey, StoreError> {
        let key = self.core.key(view);
        if key.as_str().is_empty() {
            return Err(StoreError::Configuration {
                message: format!(
                    "static binding of '{}' has no persistence key",
                    self.slice.descriptor().plural()
                )
                .into(),
                context: Some("Use a component or explicit persist policy".into()),
            });
        }
        Ok(key)
    }

    /// # Errors
    /// See [`StaticBinding::fetch`].
    pub async fn prefetch(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        self.fetch(view, false).await
    }

    /// Shows the cached entry if there is one, otherwise loads unless on-demand.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] without a persistence key; otherwise see
    /// [`StaticBinding::fetch`].
    pub async fn mount(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        let key = self.persistence_key(view)?;

        if let Some(item) = self.slice.static_item(key.as_str()) {
            *self.current.write() = Some(item);
            return Ok(FetchOutcome::Fresh);
        }
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        self.fetch(view, false).await
    }

    /// Reacts to a key change: loads unless on-demand.
    ///
    /// # Errors
    /// See [`StaticBinding::fetch`].
    pub async fn navigate(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        self.persistence_key(view)?;
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        self.fetch(view, false).await
    }

    /// Shows the cached entry unless `force`, otherwise fetches it into the static cache.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] without a persistence key; otherwise the fetch error,
    /// after the error handler has seen it.
    pub async fn fetch(&self, view: &ViewContext, force: bool) -> Result<FetchOutcome, StoreError> {
        let Some(_loading) = self.core.begin() else {
            debug!(content_type = self.slice.descriptor().plural(), "Fetch already in flight");
            return Ok(FetchOutcome::InFlight);
        };
        let key = self.persistence_key(view)?;

        if !force && let Some(item) = self.slice.static_item(key.as_str()) {
            *self.current.write() = Some(item);
            return Ok(FetchOutcome::Fresh);
        }

        let request = self.core.request(view, key.clone());
        match self.slice.fetch_static(&request).await {
            Ok(_) => {
                *self.current.write() = self.slice.static_item(key.as_str());
                Ok(FetchOutcome::Fetched)
            },
            Err(err) => Err(self.core.report(err)),
        }
    }

    /// The entry this binding last showed.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Value>> {
        self.current.read().clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    #[must_use]
    pub const fn slice(&self) -> &SliceHandle<T> {
        &self.slice
    }
}
