use crate::changes::{ChangeTarget, SliceChange};
use crate::error::{StoreError, StoreErrorExt};
use crate::request::{FetchRequest, StaticBatchReport, StaticBatchRequest};
use crate::response::{extract_collection, extract_item, graphql_errors, key_value};
use crate::slice::StateSlice;
use crate::store::ContentStore;
use crate::tags::{tag_collection, tag_item, tag_type};
use parking_lot::RwLock;
use scms_domain::{PersistenceKey, SliceCapabilities};
use scms_registry::ContentTypeDescriptor;
use scms_transport::{GraphqlClient, QueryBody, QueryTransport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

/// Accessors, mutations and fetch operations of one content type's slice.
///
/// Handles are cheap to clone and keep the store alive.
pub struct SliceHandle<T = GraphqlClient> {
    store: ContentStore<T>,
    index: usize,
    descriptor: Arc<ContentTypeDescriptor>,
}

impl<T> Clone for SliceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            index: self.index,
            descriptor: Arc::clone(&self.descriptor),
        }
    }
}

impl<T> fmt::Debug for SliceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceHandle")
            .field("content_type", &self.descriptor.singular())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<T> SliceHandle<T> {
    pub(crate) const fn new(
        store: ContentStore<T>,
        index: usize,
        descriptor: Arc<ContentTypeDescriptor>,
    ) -> Self {
        Self { store, index, descriptor }
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<ContentTypeDescriptor> {
        &self.descriptor
    }

    #[must_use]
    pub const fn store(&self) -> &ContentStore<T> {
        &self.store
    }

    fn slot(&self) -> &RwLock<StateSlice> {
        self.store.slot(self.index)
    }

    // Reads

    #[must_use]
    pub fn item(&self) -> Option<Arc<Value>> {
        self.slot().read().item.clone()
    }

    #[must_use]
    pub fn item_key(&self) -> Option<PersistenceKey> {
        self.slot().read().item_key.clone()
    }

    /// The stored item decoded into `D`.
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] when the item does not match `D`.
    pub fn item_as<D: DeserializeOwned>(&self) -> Result<Option<D>, StoreError> {
        self.item()
            .map(|item| D::deserialize(item.as_ref()))
            .transpose()
            .context(format!("Decoding {}", self.descriptor.singular()))
    }

    /// The stored collection; always empty for single types.
    #[must_use]
    pub fn collection(&self) -> Arc<[Value]> {
        Arc::clone(&self.slot().read().collection)
    }

    #[must_use]
    pub fn collection_key(&self) -> Option<PersistenceKey> {
        self.slot().read().collection_key.clone()
    }

    /// # Errors
    /// Returns [`StoreError::Decode`] on the first item that does not match `D`.
    pub fn collection_as<D: DeserializeOwned>(&self) -> Result<Vec<D>, StoreError> {
        self.collection()
            .iter()
            .map(|item| D::deserialize(item))
            .collect::<Result<Vec<_>, _>>()
            .context(format!("Decoding {}", self.descriptor.plural()))
    }

    #[must_use]
    pub fn static_item(&self, key: &str) -> Option<Arc<Value>> {
        self.slot().read().statics.get(key).cloned()
    }

    /// # Errors
    /// Returns [`StoreError::Decode`] when the entry does not match `D`.
    pub fn static_item_as<D: DeserializeOwned>(&self, key: &str) -> Result<Option<D>, StoreError> {
        self.static_item(key)
            .map(|item| D::deserialize(item.as_ref()))
            .transpose()
            .context(format!("Decoding static {} '{key}'", self.descriptor.singular()))
    }

    /// Keys of the static cache, sorted.
    #[must_use]
    pub fn static_keys(&self) -> Vec<PersistenceKey> {
        let mut keys = self.slot().read().statics.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }

    /// `true` when an item is stored and was fetched with `key`.
    #[must_use]
    pub fn is_item_fresh(&self, key: &PersistenceKey) -> bool {
        let slice = self.slot().read();
        slice.item.is_some() && key.matches(slice.item_key.as_ref())
    }

    /// `true` when the stored collection was fetched with `key`.
    #[must_use]
    pub fn is_collection_fresh(&self, key: &PersistenceKey) -> bool {
        key.matches(self.slot().read().collection_key.as_ref())
    }

    /// `false` when the stored collection came from a tagged fetch that could not tag every
    /// item; a page showing it should not be cached by item tags alone.
    #[must_use]
    pub fn is_collection_cacheable(&self) -> bool {
        !self.slot().read().collection_untagged
    }

    // Mutations

    /// Replaces the item and its persistence key together.
    pub fn set_item(&self, item: Option<Value>, key: impl Into<PersistenceKey>) {
        self.commit_item(item.map(Arc::new), key.into());
    }

    /// Replaces the collection and its persistence key together.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] for single types.
    pub fn set_collection(
        &self,
        items: Vec<Value>,
        key: impl Into<PersistenceKey>,
    ) -> Result<(), StoreError> {
        self.descriptor.ensure(SliceCapabilities::COLLECTION)?;
        self.commit_collection(items.into(), key.into(), true);
        Ok(())
    }

    /// Inserts or overwrites one static entry; `None` removes it. Other entries are untouched.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] for single types.
    pub fn set_static(
        &self,
        item: Option<Value>,
        key: impl Into<PersistenceKey>,
    ) -> Result<(), StoreError> {
        self.descriptor.ensure(SliceCapabilities::STATIC)?;
        self.commit_static(item.map(Arc::new), key.into());
        Ok(())
    }

    fn commit_item(&self, item: Option<Arc<Value>>, key: PersistenceKey) {
        {
            let mut slice = self.slot().write();
            slice.item = item;
            slice.item_key = Some(key.clone());
        }
        self.publish(ChangeTarget::Item, key);
    }

    fn commit_collection(&self, items: Arc<[Value]>, key: PersistenceKey, cacheable: bool) {
        {
            let mut slice = self.slot().write();
            slice.collection = items;
            slice.collection_key = Some(key.clone());
            slice.collection_untagged = !cacheable;
        }
        self.publish(ChangeTarget::Collection, key);
    }

    fn commit_static(&self, item: Option<Arc<Value>>, key: PersistenceKey) {
        {
            let mut slice = self.slot().write();
            match item {
                Some(item) => {
                    slice.statics.insert(key.clone(), item);
                },
                None => {
                    slice.statics.remove(&key);
                },
            }
        }
        self.publish(ChangeTarget::Static, key);
    }

    fn publish(&self, target: ChangeTarget, persistence_key: PersistenceKey) {
        debug!(
            content_type = self.descriptor.singular(),
            target = ?target,
            persistence_key = %persistence_key,
            "Slice mutated"
        );

        let change = SliceChange {
            content_type: self.descriptor.singular().to_owned(),
            target,
            persistence_key,
        };
        if self.store.inner.changes.send(Arc::new(change)).is_err() {
            trace!("No store subscribers");
        }
    }

    /// Registers the type-level tags (`S`, `S:<type>`) with the store's sink, if any.
    pub fn register_type_tags(&self) {
        if let Some(sink) = self.store.tag_sink() {
            tag_type(sink.as_ref(), &self.descriptor);
        }
    }

    fn tag_one(&self, item: Option<&Value>) {
        if let Some(sink) = self.store.tag_sink() {
            tag_type(sink.as_ref(), &self.descriptor);
            if let Some(item) = item {
                tag_item(sink.as_ref(), &self.descriptor, item);
            }
        }
    }

    /// Returns `false` when a sink is installed and some item could not be tagged.
    fn tag_many(&self, items: &[Value]) -> bool {
        self.store
            .tag_sink()
            .is_none_or(|sink| tag_collection(sink.as_ref(), &self.descriptor, items))
    }
}

impl<T: QueryTransport> SliceHandle<T> {
    /// One transport call; a non-empty `errors` array turns the response into an error.
    async fn run_query(&self, query: &QueryBody, variables: &Value) -> Result<Value, StoreError> {
        let response = self.store.transport().query(query, variables).await?;

        if let Some(message) = graphql_errors(&response) {
            return Err(StoreError::GraphQl { message: message.into(), context: None });
        }
        Ok(response)
    }

    /// Fetches one item and stores it under the request's persistence key.
    ///
    /// A response without the item is a success with `None`. On failure the slot is reset to
    /// no item under the attempted key and the error is returned.
    ///
    /// # Errors
    /// [`StoreError::Transport`] or [`StoreError::GraphQl`].
    #[instrument(
        skip_all,
        fields(content_type = %self.descriptor.singular(), persistence_key = %request.persistence_key)
    )]
    pub async fn fetch_item(
        &self,
        request: &FetchRequest,
    ) -> Result<Option<Arc<Value>>, StoreError> {
        match self.run_query(&request.query, &request.variables).await {
            Ok(response) => {
                let item = extract_item(&response, &self.descriptor).map(Arc::new);
                self.tag_one(item.as_deref());
                info!(found = item.is_some(), "Item fetched");
                self.commit_item(item.clone(), request.persistence_key.clone());
                Ok(item)
            },
            Err(err) => {
                error!(error = %err, "Item fetch failed; resetting item");
                self.commit_item(None, request.persistence_key.clone());
                Err(err)
            },
        }
    }

    /// Fetches the collection and stores it under the request's persistence key.
    ///
    /// On failure the collection is reset to empty under the attempted key.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] for single types (nothing is sent), otherwise
    /// [`StoreError::Transport`] or [`StoreError::GraphQl`].
    #[instrument(
        skip_all,
        fields(content_type = %self.descriptor.plural(), persistence_key = %request.persistence_key)
    )]
    pub async fn fetch_collection(
        &self,
        request: &FetchRequest,
    ) -> Result<Arc<[Value]>, StoreError> {
        self.descriptor.ensure(SliceCapabilities::COLLECTION)?;

        match self.run_query(&request.query, &request.variables).await {
            Ok(response) => {
                let items: Arc<[Value]> = extract_collection(&response, &self.descriptor).into();
                let cacheable = self.tag_many(&items);
                info!(count = items.len(), cacheable, "Collection fetched");
                let key = request.persistence_key.clone();
                self.commit_collection(Arc::clone(&items), key, cacheable);
                Ok(items)
            },
            Err(err) => {
                error!(error = %err, "Collection fetch failed; resetting collection");
                let key = request.persistence_key.clone();
                self.commit_collection(Arc::from(Vec::new()), key, true);
                Err(err)
            },
        }
    }

    /// Fetches one item into the static cache under the request's persistence key.
    ///
    /// Failures leave the static cache untouched, including the attempted key's entry.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] for single types, otherwise
    /// [`StoreError::Transport`] or [`StoreError::GraphQl`].
    #[instrument(
        skip_all,
        fields(content_type = %self.descriptor.singular(), persistence_key = %request.persistence_key)
    )]
    pub async fn fetch_static(
        &self,
        request: &FetchRequest,
    ) -> Result<Option<Arc<Value>>, StoreError> {
        self.descriptor.ensure(SliceCapabilities::STATIC)?;

        let response = self.run_query(&request.query, &request.variables).await.inspect_err(
            |err| error!(error = %err, "Static fetch failed; static cache left unchanged"),
        )?;

        let item = extract_item(&response, &self.descriptor).map(Arc::new);
        self.tag_one(item.as_deref());
        info!(found = item.is_some(), "Static item fetched");
        self.commit_static(item.clone(), request.persistence_key.clone());
        Ok(item)
    }

    /// Fetches a collection and stores every item as its own static entry, keyed by the
    /// request's key field (the type's cache key by default).
    ///
    /// Items without a usable key are skipped; the rest are committed independently.
    ///
    /// # Errors
    /// [`StoreError::Configuration`] for single types, otherwise
    /// [`StoreError::Transport`] or [`StoreError::GraphQl`]; nothing is stored then.
    #[instrument(skip_all, fields(content_type = %self.descriptor.plural()))]
    pub async fn fetch_static_collection(
        &self,
        request: &StaticBatchRequest,
    ) -> Result<StaticBatchReport, StoreError> {
        self.descriptor.ensure(SliceCapabilities::STATIC)?;

        let response = self.run_query(&request.query, &request.variables).await.inspect_err(
            |err| error!(error = %err, "Static batch failed; static cache left unchanged"),
        )?;

        let items = extract_collection(&response, &self.descriptor);
        let key_field = request.key_field.as_deref().unwrap_or_else(|| self.descriptor.cache_key());
        self.tag_many(&items);

        let mut report = StaticBatchReport::default();
        for item in items {
            let Some(key) = key_value(&item, key_field) else {
                warn!(key_field, "Static batch item has no key; skipping");
                report.skipped += 1;
                continue;
            };
            let key = PersistenceKey::from(key);
            self.commit_static(Some(Arc::new(item)), key.clone());
            report.stored.push(key);
        }

        info!(stored = report.stored.len(), skipped = report.skipped, "Static batch fetched");
        Ok(report)
    }
}
