use crate::changes::{SliceChange, Subscription};
use crate::error::StoreError;
use crate::handle::SliceHandle;
use crate::module::{Route, build_routes};
use crate::slice::StateSlice;
use crate::tags::CacheTagSink;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use scms_registry::TypeRegistry;
use scms_transport::{GraphqlClient, QueryTransport};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Buffered changes per subscriber before it starts lagging.
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;

pub(crate) struct StoreInner<T> {
    pub(crate) registry: TypeRegistry,
    pub(crate) transport: T,
    pub(crate) slices: Box<[RwLock<StateSlice>]>,
    pub(crate) tag_sink: Option<Arc<dyn CacheTagSink>>,
    pub(crate) changes: broadcast::Sender<Arc<SliceChange>>,
    pub(crate) routes: FxHashMap<String, Route>,
}

/// The namespaced content store: one state slice per registered content type.
///
/// Cloning is cheap and shares the state. Reads are snapshots; mutations replace a value and
/// its persistence key under a single write lock.
pub struct ContentStore<T = GraphqlClient> {
    pub(crate) inner: Arc<StoreInner<T>>,
}

impl<T> Clone for ContentStore<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> fmt::Debug for ContentStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("types", &self.inner.registry.len())
            .field("tagging", &self.inner.tag_sink.is_some())
            .field("subscribers", &self.inner.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<T: QueryTransport> ContentStore<T> {
    /// Creates a new [`ContentStoreBuilder`].
    pub fn builder(registry: TypeRegistry, transport: T) -> ContentStoreBuilder<T> {
        ContentStoreBuilder::new(registry, transport)
    }

    /// A store without a cache-tag sink.
    pub fn new(registry: TypeRegistry, transport: T) -> Self {
        Self::builder(registry, transport).build()
    }
}

impl<T> ContentStore<T> {
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    #[must_use]
    pub fn tag_sink(&self) -> Option<&Arc<dyn CacheTagSink>> {
        self.inner.tag_sink.as_ref()
    }

    /// The slice of a content type, looked up by any spelling of its name.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] for unknown types.
    pub fn slice(&self, type_name: &str) -> Result<SliceHandle<T>, StoreError> {
        let descriptor = self.inner.registry.require(type_name)?;
        let index = self.inner.registry.position(descriptor).ok_or_else(|| {
            StoreError::Internal {
                message: format!("descriptor '{}' has no slice", descriptor.singular()).into(),
                context: None,
            }
        })?;
        Ok(SliceHandle::new(self.clone(), index, Arc::clone(descriptor)))
    }

    /// Every slice, in registry order.
    pub fn slices(&self) -> impl Iterator<Item = SliceHandle<T>> + '_ {
        self.inner
            .registry
            .iter()
            .enumerate()
            .map(|(index, descriptor)| SliceHandle::new(self.clone(), index, Arc::clone(descriptor)))
    }

    /// Subscribes to [`SliceChange`]s published after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.inner.changes.subscribe())
    }

    pub(crate) fn slice_at(&self, index: usize) -> Result<SliceHandle<T>, StoreError> {
        let descriptor = self.inner.registry.get(index).ok_or_else(|| StoreError::Internal {
            message: format!("no slice at {index}").into(),
            context: None,
        })?;
        Ok(SliceHandle::new(self.clone(), index, Arc::clone(descriptor)))
    }

    pub(crate) fn slot(&self, index: usize) -> &RwLock<StateSlice> {
        &self.inner.slices[index]
    }
}

/// A fluent builder for [`ContentStore`].
#[must_use = "builders do nothing unless you call .build()"]
pub struct ContentStoreBuilder<T> {
    registry: TypeRegistry,
    transport: T,
    tag_sink: Option<Arc<dyn CacheTagSink>>,
    change_capacity: usize,
}

impl<T> fmt::Debug for ContentStoreBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStoreBuilder")
            .field("registry", &self.registry)
            .field("tag_sink", &self.tag_sink)
            .field("change_capacity", &self.change_capacity)
            .finish_non_exhaustive()
    }
}

impl<T: QueryTransport> ContentStoreBuilder<T> {
    pub fn new(registry: TypeRegistry, transport: T) -> Self {
        Self { registry, transport, tag_sink: None, change_capacity: DEFAULT_CHANGE_CAPACITY }
    }

    /// Installs the sink receiving cache tags of successful fetches.
    pub fn tag_sink(mut self, sink: Arc<dyn CacheTagSink>) -> Self {
        self.tag_sink = Some(sink);
        self
    }

    /// Number of changes retained for slow subscribers.
    pub fn change_capacity(mut self, capacity: usize) -> Self {
        self.change_capacity = capacity.max(1);
        self
    }

    /// Generates one empty slice per descriptor and the identifier routing table.
    pub fn build(self) -> ContentStore<T> {
        let slices = self.registry.iter().map(|_| RwLock::new(StateSlice::default())).collect();
        let routes = build_routes(&self.registry);
        let (changes, _) = broadcast::channel(self.change_capacity);

        info!(
            types = self.registry.len(),
            identifiers = routes.len(),
            tagging = self.tag_sink.is_some(),
            "Content store generated"
        );

        ContentStore {
            inner: Arc::new(StoreInner {
                registry: self.registry,
                transport: self.transport,
                slices,
                tag_sink: self.tag_sink,
                changes,
                routes,
            }),
        }
    }
}
