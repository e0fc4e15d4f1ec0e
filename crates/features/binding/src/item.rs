use crate::common::{BindingCore, ErrorHandler};
use crate::options::{BindingOptions, FetchOutcome, QuerySpec};
use scms_domain::{PersistenceKey, ViewContext};
use scms_store::{ContentStore, SliceHandle, StoreError};
use scms_transport::{GraphqlClient, QueryTransport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Binds a view to the item slot of a content type.
///
/// Creating the binding registers the type-level cache tags.
pub struct ItemBinding<T = GraphqlClient> {
    slice: SliceHandle<T>,
    core: BindingCore,
}

impl<T> Clone for ItemBinding<T> {
    fn clone(&self) -> Self {
        Self { slice: self.slice.clone(), core: self.core.clone() }
    }
}

impl<T> fmt::Debug for ItemBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemBinding").field("slice", &self.slice).field("core", &self.core).finish()
    }
}

impl<T: QueryTransport> ItemBinding<T> {
    /// # Errors
    /// Returns [`StoreError::Configuration`] for unknown content types.
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
        slice.register_type_tags();
        Ok(Self { slice, core: BindingCore::new(options, Arc::new(source)) })
    }

    /// Installs the handler invoked with every fetch error.
    #[must_use]
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(&StoreError) + Send + Sync + 'static,
    {
        self.core.set_error_handler(Arc::new(handler) as ErrorHandler);
        self
    }

    #[must_use]
    pub fn persistence_key(&self, view: &ViewContext) -> PersistenceKey {
        self.core.key(view)
    }

    /// `true` when an item fetched with this view's key is stored.
    #[must_use]
    pub fn is_fresh(&self, view: &ViewContext) -> bool {
        self.slice.is_item_fresh(&self.core.key(view))
    }

    /// Server-side prefetch: loads unless on-demand.
    ///
    /// # Errors
    /// See [`ItemBinding::fetch`].
    pub async fn prefetch(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        self.fetch(view).await
    }

    /// Loads unless on-demand, or unless an item for this view's key is already stored.
    ///
    /// # Errors
    /// See [`ItemBinding::fetch`].
    pub async fn mount(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        if self.is_fresh(view) {
            return Ok(FetchOutcome::Fresh);
        }
        self.fetch(view).await
    }

    /// Reacts to a route or key change like [`ItemBinding::mount`].
    ///
    /// # Errors
    /// See [`ItemBinding::fetch`].
    pub async fn navigate(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        self.mount(view).await
    }

    /// Fetches the item for this view; a no-op while this binding is already loading.
    ///
    /// # Errors
    /// The fetch error, after the error handler has seen it.
    pub async fn fetch(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        let Some(_loading) = self.core.begin() else {
            debug!(content_type = self.slice.descriptor().singular(), "Fetch already in flight");
            return Ok(FetchOutcome::InFlight);
        };

        let key = self.core.key(view);
        let request = self.core.request(view, key);
        self.slice
            .fetch_item(&request)
            .await
            .map(|_| FetchOutcome::Fetched)
            .map_err(|err| self.core.report(err))
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Value>> {
        self.slice.item()
    }

    /// # Errors
    /// Returns [`StoreError::Decode`] when the item does not match `D`.
    pub fn snapshot_as<D: DeserializeOwned>(&self) -> Result<Option<D>, StoreError> {
        self.slice.item_as()
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
