use fxhash::FxHashMap;
use scms_domain::PersistenceKey;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The state owned by one descriptor. Values and their keys are always replaced together.
#[derive(Debug, Default)]
pub(crate) struct StateSlice {
    pub(crate) item: Option<Arc<Value>>,
    pub(crate) item_key: Option<PersistenceKey>,
    pub(crate) collection: Arc<[Value]>,
    pub(crate) collection_key: Option<PersistenceKey>,
    /// Set when the last fetched collection had an item without a cache key.
    pub(crate) collection_untagged: bool,
    pub(crate) statics: FxHashMap<PersistenceKey, Arc<Value>>,
}

impl StateSlice {
    pub(crate) fn item_json(&self) -> Value {
        self.item.as_deref().cloned().unwrap_or(Value::Null)
    }

    pub(crate) fn collection_json(&self) -> Value {
        Value::Array(self.collection.to_vec())
    }

    pub(crate) fn statics_json(&self) -> Value {
        Value::Object(
            self.statics
                .iter()
                .map(|(key, item)| (key.to_string(), item.as_ref().clone()))
                .collect::<Map<_, _>>(),
        )
    }
}

pub(crate) fn key_json(key: Option<&PersistenceKey>) -> Value {
    key.map_or(Value::Null, |key| Value::String(key.to_string()))
}
