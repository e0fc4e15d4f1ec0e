//! Cache tags registered by successful fetches.

use crate::response::key_value;
use fxhash::FxHashSet;
use parking_lot::Mutex;
use scms_domain::CacheTag;
use scms_registry::ContentTypeDescriptor;
use serde_json::Value;
use std::fmt::Debug;
use tracing::warn;

/// Receives cache tags; typically drained once per request/response cycle by the page cache.
pub trait CacheTagSink: Debug + Send + Sync {
    fn add(&self, tag: CacheTag);
}

/// Default in-memory sink: an append-only set that keeps first-insertion order.
#[derive(Debug, Default)]
pub struct CacheTagSet {
    inner: Mutex<TagSetInner>,
}

#[derive(Debug, Default)]
struct TagSetInner {
    order: Vec<CacheTag>,
    seen: FxHashSet<CacheTag>,
}

impl CacheTagSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags collected so far, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CacheTag> {
        self.inner.lock().order.clone()
    }

    /// Takes every collected tag, leaving the set empty.
    pub fn drain(&self) -> Vec<CacheTag> {
        let mut inner = self.inner.lock();
        inner.seen.clear();
        std::mem::take(&mut inner.order)
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.seen.clear();
        inner.order.clear();
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.inner.lock().order.iter().any(|t| t.as_str() == tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().order.is_empty()
    }
}

impl CacheTagSink for CacheTagSet {
    fn add(&self, tag: CacheTag) {
        let mut inner = self.inner.lock();
        if inner.seen.insert(tag.clone()) {
            inner.order.push(tag);
        }
    }
}

/// Registers `S` and `S:<type>`.
pub(crate) fn tag_type(sink: &dyn CacheTagSink, descriptor: &ContentTypeDescriptor) {
    sink.add(CacheTag::root());
    sink.add(CacheTag::content_type(descriptor.singular()));
}

/// Registers `S:<type>:<key>` for one item. Returns `false` when the item lacks its cache key.
pub(crate) fn tag_item(
    sink: &dyn CacheTagSink,
    descriptor: &ContentTypeDescriptor,
    item: &Value,
) -> bool {
    if !descriptor.cache_items() {
        return true;
    }

    if let Some(id) = key_value(item, descriptor.cache_key()) {
        sink.add(CacheTag::item(descriptor.singular(), &id));
        true
    } else {
        warn!(
            content_type = descriptor.singular(),
            cache_key = descriptor.cache_key(),
            "Item lacks its cache key; skipping item cache tag"
        );
        false
    }
}

/// Tags a collection, stopping at the first item without a cache key.
///
/// Returns `true` when every item was tagged.
pub(crate) fn tag_collection(
    sink: &dyn CacheTagSink,
    descriptor: &ContentTypeDescriptor,
    items: &[Value],
) -> bool {
    tag_type(sink, descriptor);

    for item in items {
        if !tag_item(sink, descriptor, item) {
            warn!(
                content_type = descriptor.plural(),
                count = items.len(),
                "Collection is not fully cacheable"
            );
            return false;
        }
    }
    true
}
