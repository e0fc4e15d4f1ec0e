use scms_domain::PersistPolicy;
use scms_transport::QueryBody;
use serde_json::{Map, Value};

/// How a binding derives its persistence key and whether it loads eagerly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Never fetch on prefetch, mount or navigation; only explicit `fetch` calls load content.
    pub on_demand: bool,
    pub persist: PersistPolicy,
}

impl BindingOptions {
    #[must_use]
    pub fn on_demand(mut self) -> Self {
        self.on_demand = true;
        self
    }

    #[must_use]
    pub fn persist(mut self, policy: PersistPolicy) -> Self {
        self.persist = policy;
        self
    }
}

/// What a view's query source produces for the current view context.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub query: QueryBody,
    pub variables: Value,
}

impl QuerySpec {
    pub fn new(query: impl Into<QueryBody>) -> Self {
        Self { query: query.into(), variables: Value::Object(Map::new()) }
    }

    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}

/// What a lifecycle hook or an explicit fetch ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A fetch was dispatched and succeeded.
    Fetched,
    /// The stored content already matches the current persistence key.
    Fresh,
    /// The binding is on-demand and the hook does not load.
    Deferred,
    /// This binding already has a fetch in flight.
    InFlight,
}
