use crate::error::{StrapiError, StrapiErrorExt};
use scms_binding::{
    BindingOptions, CollectionBinding, ItemBinding, QuerySpec, RestContent, StaticBinding,
};
use scms_domain::ViewContext;
use scms_domain::config::StrapiConfig;
use scms_registry::{ContentTypeDescriptor, TypeRegistry};
use scms_store::{CacheTagSink, ContentStore};
use scms_transport::{GraphqlClient, QueryTransport};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::info;

/// Everything the integration owns: configuration, type registry, transport, store and the
/// optional cache-tag sink.
pub struct StrapiInner<T> {
    config: StrapiConfig,
    store: ContentStore<T>,
}

impl<T> StrapiInner<T> {
    #[must_use]
    pub const fn config(&self) -> &StrapiConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &ContentStore<T> {
        &self.store
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        self.store.registry()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        self.store.transport()
    }

    #[must_use]
    pub fn tag_sink(&self) -> Option<&Arc<dyn CacheTagSink>> {
        self.store.tag_sink()
    }

    /// Looks a content type up by any spelling of its name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&Arc<ContentTypeDescriptor>> {
        self.registry().resolve(name)
    }
}

impl<T> fmt::Debug for StrapiInner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrapiInner")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

/// The explicit integration context. Cloning is cheap.
pub struct Strapi<T = GraphqlClient> {
    inner: Arc<StrapiInner<T>>,
}

impl<T> Clone for Strapi<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Deref for Strapi<T> {
    type Target = StrapiInner<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> fmt::Debug for Strapi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strapi")
            .field("url", &self.inner.config.url)
            .field("store", &self.inner.store)
            .finish()
    }
}

impl Strapi {
    /// Builds the integration with the GraphQL client and no cache-tag sink.
    ///
    /// # Errors
    /// Fails on invalid content types or an invalid CMS URL.
    pub fn from_config(config: &StrapiConfig) -> Result<Self, StrapiError> {
        Self::builder(config.clone()).build()
    }

    pub fn builder(config: StrapiConfig) -> StrapiBuilder {
        StrapiBuilder::new(config)
    }
}

impl<T: QueryTransport> Strapi<T> {
    /// # Errors
    /// Returns [`StrapiError::Store`] for unknown content types.
    pub fn item<F>(
        &self,
        type_name: &str,
        options: BindingOptions,
        source: F,
    ) -> Result<ItemBinding<T>, StrapiError>
    where
        F: Fn(&ViewContext) -> QuerySpec + Send + Sync + 'static,
    {
        ItemBinding::new(&self.inner.store, type_name, options, source)
            .context("Creating item binding")
    }

    /// # Errors
    /// Returns [`StrapiError::Store`] for unknown or single content types.
    pub fn collection<F>(
        &self,
        type_name: &str,
        options: BindingOptions,
        source: F,
    ) -> Result<CollectionBinding<T>, StrapiError>
    where
        F: Fn(&ViewContext) -> QuerySpec + Send + Sync + 'static,
    {
        CollectionBinding::new(&self.inner.store, type_name, options, source)
            .context("Creating collection binding")
    }

    /// # Errors
    /// Returns [`StrapiError::Store`] for unknown or single content types.
    pub fn static_item<F>(
        &self,
        type_name: &str,
        options: BindingOptions,
        source: F,
    ) -> Result<StaticBinding<T>, StrapiError>
    where
        F: Fn(&ViewContext) -> QuerySpec + Send + Sync + 'static,
    {
        StaticBinding::new(&self.inner.store, type_name, options, source)
            .context("Creating static binding")
    }

    /// A REST fallback buffer localizing the configured fields.
    #[must_use]
    pub fn rest(&self) -> RestContent<T> {
        RestContent::new(&self.inner.store, &self.inner.config.rest)
    }

    /// Absolute URL of a CMS-relative path such as an upload.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        self.transport().resolve(path)
    }
}

/// Builder for [`Strapi`].
#[must_use = "builders do nothing unless you call .build()"]
pub struct StrapiBuilder {
    config: StrapiConfig,
    tag_sink: Option<Arc<dyn CacheTagSink>>,
}

impl fmt::Debug for StrapiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrapiBuilder")
            .field("url", &self.config.url)
            .field("types", &self.config.types.len())
            .field("tag_sink", &self.tag_sink)
            .finish()
    }
}

impl StrapiBuilder {
    pub const fn new(config: StrapiConfig) -> Self {
        Self { config, tag_sink: None }
    }

    pub fn tag_sink(mut self, sink: Arc<dyn CacheTagSink>) -> Self {
        self.tag_sink = Some(sink);
        self
    }

    /// Builds with the GraphQL client configured by `strapi.url` and `strapi.graphql_path`.
    ///
    /// # Errors
    /// Fails on invalid content types or an invalid CMS URL.
    pub fn build(self) -> Result<Strapi, StrapiError> {
        let client = GraphqlClient::from_config(&self.config).context("Creating GraphQL client")?;
        self.build_with(client)
    }

    /// Builds with a custom transport.
    ///
    /// # Errors
    /// Fails on invalid content types.
    pub fn build_with<T: QueryTransport>(self, transport: T) -> Result<Strapi<T>, StrapiError> {
        let registry = TypeRegistry::build(&self.config.types).context("Building type registry")?;

        let mut store = ContentStore::builder(registry, transport);
        if let Some(sink) = self.tag_sink {
            store = store.tag_sink(sink);
        }
        let store = store.build();

        info!(url = %self.config.url, types = store.registry().len(), "Strapi integration ready");

        Ok(Strapi { inner: Arc::new(StrapiInner { config: self.config, store }) })
    }
}
