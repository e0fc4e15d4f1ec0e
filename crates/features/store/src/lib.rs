//! # Content Store
//!
//! One state slice per registered content type, generated from the [`TypeRegistry`]:
//!
//! * **reads**: `item`, `collection`, `static_item` and their typed `*_as` variants, each a
//!   snapshot;
//! * **mutations**: `set_item`, `set_collection`, `set_static`, replacing a value and its
//!   [`PersistenceKey`] together;
//! * **fetches**: `fetch_item`, `fetch_collection`, `fetch_static`,
//!   `fetch_static_collection`, each a single [`QueryTransport`] call.
//!
//! The same operations are reachable by identifier (`strapi/SET_ARTICLE`,
//! `strapi/fetchArticles`) through [`ContentStore::commit`] and [`ContentStore::dispatch`].
//!
//! ```rust,no_run
//! use scms_domain::config::ContentTypeConfig;
//! use scms_registry::TypeRegistry;
//! use scms_store::{ContentStore, FetchRequest};
//! use scms_transport::GraphqlClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TypeRegistry::build(&[ContentTypeConfig::collection("article")])?;
//! let client = GraphqlClient::builder().url("http://localhost:1337").build()?;
//! let store = ContentStore::new(registry, client);
//!
//! let articles = store.slice("articles")?;
//! articles
//!     .fetch_collection(&FetchRequest::new("{ articles { id title } }", "/blog"))
//!     .await?;
//! assert_eq!(articles.collection_key().as_ref().map(|k| k.as_str()), Some("/blog"));
//! # Ok(())
//! # }
//! ```
//!
//! [`TypeRegistry`]: scms_registry::TypeRegistry
//! [`PersistenceKey`]: scms_domain::PersistenceKey
//! [`QueryTransport`]: scms_transport::QueryTransport

mod changes;
mod error;
mod handle;
mod module;
mod request;
mod response;
mod slice;
mod store;
mod tags;

pub use changes::{ChangeTarget, SliceChange, Subscription};
pub use error::{StoreError, StoreErrorExt};
pub use handle::SliceHandle;
pub use module::{ModuleManifest, NAMESPACE};
pub use request::{
    DispatchRequest, FetchRequest, MutationPayload, StaticBatchReport, StaticBatchRequest,
};
pub use store::{ContentStore, ContentStoreBuilder, DEFAULT_CHANGE_CAPACITY};
pub use tags::{CacheTagSet, CacheTagSink};
