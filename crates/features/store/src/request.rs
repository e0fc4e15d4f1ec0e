use scms_domain::PersistenceKey;
use scms_transport::QueryBody;
use serde::Serialize;
use serde_json::Value;

/// One fetch: the query, its variables and the persistence key the result is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub query: QueryBody,
    pub variables: Value,
    pub persistence_key: PersistenceKey,
}

impl FetchRequest {
    /// A request with empty variables.
    pub fn new(query: impl Into<QueryBody>, persistence_key: impl Into<PersistenceKey>) -> Self {
        Self {
            query: query.into(),
            variables: Value::Object(serde_json::Map::new()),
            persistence_key: persistence_key.into(),
        }
    }

    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}

/// Fetches a whole collection into the static cache, one entry per item.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBatchRequest {
    pub query: QueryBody,
    pub variables: Value,
    /// Item field whose value becomes the static key; the type's cache key when `None`.
    pub key_field: Option<String>,
}

impl StaticBatchRequest {
    pub fn new(query: impl Into<QueryBody>) -> Self {
        Self { query: query.into(), variables: Value::Object(serde_json::Map::new()), key_field: None }
    }

    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = Some(field.into());
        self
    }
}

/// Outcome of a static batch: the keys written and how many items had no usable key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticBatchReport {
    pub stored: Vec<PersistenceKey>,
    pub skipped: usize,
}

/// Payload of [`crate::ContentStore::commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum MutationPayload {
    /// For `SET_<SINGULAR>` and `SET_<PLURAL>_STATIC`.
    Item { item: Option<Value>, persistence_key: PersistenceKey },
    /// For `SET_<PLURAL>`.
    Collection { items: Vec<Value>, persistence_key: PersistenceKey },
}

/// Argument of [`crate::ContentStore::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRequest {
    Fetch(FetchRequest),
    StaticBatch(StaticBatchRequest),
}

impl From<FetchRequest> for DispatchRequest {
    fn from(value: FetchRequest) -> Self {
        Self::Fetch(value)
    }
}

impl From<StaticBatchRequest> for DispatchRequest {
    fn from(value: StaticBatchRequest) -> Self {
        Self::StaticBatch(value)
    }
}
