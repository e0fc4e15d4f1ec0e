use crate::common::{BindingCore, ErrorHandler};
use crate::options::{BindingOptions, FetchOutcome, QuerySpec};
use scms_domain::{PersistenceKey, SliceCapabilities, ViewContext};
use scms_store::{ContentStore, SliceHandle, StoreError};
use scms_transport::{GraphqlClient, QueryTransport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Binds a view to the collection slot of a content type.
pub struct CollectionBinding<T = GraphqlClient> {
    slice: SliceHandle<T>,
    core: BindingCore,
}

impl<T> Clone for CollectionBinding<T> {
    fn clone(&self) -> Self {
        Self { slice: self.slice.clone(), core: self.core.clone() }
    }
}

impl<T> fmt::Debug for CollectionBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionBinding")
            .field("slice", &self.slice)
            .field("core", &self.core)
            .finish()
    }
}

impl<T: QueryTransport> CollectionBinding<T> {
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
        slice.descriptor().ensure(SliceCapabilities::COLLECTION)?;
        Ok(Self { slice, core: BindingCore::new(options, Arc::new(source)) })
    }

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

    #[must_use]
    pub fn is_fresh(&self, view: &ViewContext) -> bool {
        self.slice.is_collection_fresh(&self.core.key(view))
    }

    /// # Errors
    /// See [`CollectionBinding::fetch`].
    pub async fn prefetch(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        self.fetch(view).await
    }

    /// Loads unless on-demand, or unless a non-empty collection for this view's key is stored.
    ///
    /// # Errors
    /// See [`CollectionBinding::fetch`].
    pub async fn mount(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        if !self.slice.collection().is_empty() && self.is_fresh(view) {
            return Ok(FetchOutcome::Fresh);
        }
        self.fetch(view).await
    }

    /// Loads on a route change unless on-demand or the stored key still matches.
    ///
    /// # Errors
    /// See [`CollectionBinding::fetch`].
    pub async fn navigate(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        if self.core.options.on_demand {
            return Ok(FetchOutcome::Deferred);
        }
        if self.is_fresh(view) {
            return Ok(FetchOutcome::Fresh);
        }
        self.fetch(view).await
    }

    /// # Errors
    /// The fetch error, after the error handler has seen it.
    pub async fn fetch(&self, view: &ViewContext) -> Result<FetchOutcome, StoreError> {
        let Some(_loading) = self.core.begin() else {
            debug!(content_type = self.slice.descriptor().plural(), "Fetch already in flight");
            return Ok(FetchOutcome::InFlight);
        };

        let key = self.core.key(view);
        let request = self.core.request(view, key);
        self.slice
            .fetch_collection(&request)
            .await
            .map(|_| FetchOutcome::Fetched)
            .map_err(|err| self.core.report(err))
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<[Value]> {
        self.slice.collection()
    }

    /// # Errors
    /// Returns [`StoreError::Decode`] on the first item that does not match `D`.
    pub fn snapshot_as<D: DeserializeOwned>(&self) -> Result<Vec<D>, StoreError> {
        self.slice.collection_as()
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
