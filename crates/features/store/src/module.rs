//! The namespaced module surface: string identifiers routed to slice operations.
//!
//! Every identifier comes from the descriptor tables and is routed through a table built once
//! when the store is generated. Identifiers may be given bare (`SET_ARTICLE`) or namespaced
//! (`strapi/SET_ARTICLE`).

use crate::error::StoreError;
use crate::request::{DispatchRequest, MutationPayload};
use crate::slice::key_json;
use crate::store::ContentStore;
use fxhash::FxHashMap;
use scms_registry::TypeRegistry;
use scms_transport::QueryTransport;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Namespace of the content module.
pub const NAMESPACE: &str = "strapi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    SetItem,
    SetCollection,
    SetStatic,
    FetchItem,
    FetchCollection,
    FetchStatic,
    FetchStaticCollection,
}

impl Operation {
    const fn is_mutation(self) -> bool {
        matches!(self, Self::SetItem | Self::SetCollection | Self::SetStatic)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Route {
    index: usize,
    operation: Operation,
}

pub(crate) fn build_routes(registry: &TypeRegistry) -> FxHashMap<String, Route> {
    let mut routes = FxHashMap::default();

    for (index, descriptor) in registry.iter().enumerate() {
        let actions = descriptor.actions();
        let mutations = descriptor.mutations();

        let table = [
            (Some(&mutations.set_item), Operation::SetItem),
            (mutations.set_collection.as_ref(), Operation::SetCollection),
            (mutations.set_static.as_ref(), Operation::SetStatic),
            (Some(&actions.fetch_item), Operation::FetchItem),
            (actions.fetch_collection.as_ref(), Operation::FetchCollection),
            (actions.fetch_static.as_ref(), Operation::FetchStatic),
            (actions.fetch_static_collection.as_ref(), Operation::FetchStaticCollection),
        ];

        for (id, operation) in table {
            if let Some(id) = id {
                routes.insert(id.clone(), Route { index, operation });
            }
        }
    }

    routes
}

/// Everything the content module registers, namespaced (`strapi/...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleManifest {
    pub namespace: &'static str,
    pub state: Vec<String>,
    pub getters: Vec<String>,
    pub mutations: Vec<String>,
    pub actions: Vec<String>,
}

fn namespaced(id: &str) -> String {
    format!("{NAMESPACE}/{id}")
}

impl<T> ContentStore<T> {
    /// Lists the state keys, getters, mutations and actions of every content type.
    #[must_use]
    pub fn manifest(&self) -> ModuleManifest {
        let mut manifest = ModuleManifest {
            namespace: NAMESPACE,
            state: Vec::new(),
            getters: Vec::new(),
            mutations: Vec::new(),
            actions: Vec::new(),
        };

        for descriptor in self.registry().iter() {
            let keys = descriptor.state_keys();
            manifest.state.push(keys.item.clone());
            manifest.state.push(keys.item_persistence_key.clone());
            manifest.state.extend(keys.collection.iter().cloned());
            manifest.state.extend(keys.static_map.iter().cloned());
            manifest.state.extend(keys.collection_persistence_key.iter().cloned());

            manifest.getters.push(namespaced(&keys.item));
            manifest.getters.extend(keys.collection.iter().map(|key| namespaced(key)));
            manifest.getters.extend(keys.static_map.iter().map(|key| namespaced(key)));

            for (kind, id) in descriptor.identifiers() {
                match kind {
                    "mutation" => manifest.mutations.push(namespaced(id)),
                    "action" => manifest.actions.push(namespaced(id)),
                    _ => {},
                }
            }
        }

        manifest
    }

    /// The whole namespaced state as one JSON object.
    #[must_use]
    pub fn state(&self) -> Value {
        let mut state = Map::new();

        for (index, descriptor) in self.registry().iter().enumerate() {
            let keys = descriptor.state_keys().clone();
            let slice = self.slot(index).read();

            state.insert(keys.item, slice.item_json());
            state.insert(keys.item_persistence_key, key_json(slice.item_key.as_ref()));
            if let Some(key) = keys.collection {
                state.insert(key, slice.collection_json());
            }
            if let Some(key) = keys.static_map {
                state.insert(key, slice.statics_json());
            }
            if let Some(key) = keys.collection_persistence_key {
                state.insert(key, key_json(slice.collection_key.as_ref()));
            }
        }

        Value::Object(state)
    }

    fn route(&self, id: &str) -> Result<Route, StoreError> {
        let bare = id.strip_prefix(NAMESPACE).and_then(|rest| rest.strip_prefix('/')).unwrap_or(id);
        self.inner
            .routes
            .get(bare)
            .copied()
            .ok_or_else(|| StoreError::configuration(format!("unknown identifier '{id}'")))
    }

    /// Applies a mutation by identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] for unknown identifiers, action identifiers, or a
    /// payload of the wrong shape.
    pub fn commit(&self, mutation: &str, payload: MutationPayload) -> Result<(), StoreError> {
        let route = self.route(mutation)?;
        if !route.operation.is_mutation() {
            return Err(StoreError::configuration(format!("'{mutation}' is not a mutation")));
        }
        debug!(mutation, "Committing");

        let handle = self.slice_at(route.index)?;
        match (route.operation, payload) {
            (Operation::SetItem, MutationPayload::Item { item, persistence_key }) => {
                handle.set_item(item, persistence_key);
                Ok(())
            },
            (Operation::SetCollection, MutationPayload::Collection { items, persistence_key }) => {
                handle.set_collection(items, persistence_key)
            },
            (Operation::SetStatic, MutationPayload::Item { item, persistence_key }) => {
                handle.set_static(item, persistence_key)
            },
            _ => Err(StoreError::configuration(format!("payload does not fit '{mutation}'"))),
        }
    }
}

impl<T: QueryTransport> ContentStore<T> {
    /// Runs an action by identifier and returns what it stored as JSON.
    ///
    /// Item actions return the item (or `null`), collection actions the array, static batches
    /// their report.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] for unknown identifiers, mutation identifiers, or a
    /// request of the wrong shape; otherwise whatever the fetch returns.
    pub async fn dispatch(
        &self,
        action: &str,
        request: impl Into<DispatchRequest>,
    ) -> Result<Value, StoreError> {
        let route = self.route(action)?;
        if route.operation.is_mutation() {
            return Err(StoreError::configuration(format!("'{action}' is not an action")));
        }
        debug!(action, "Dispatching");

        let handle = self.slice_at(route.index)?;
        match (route.operation, request.into()) {
            (Operation::FetchItem, DispatchRequest::Fetch(request)) => {
                let item = handle.fetch_item(&request).await?;
                Ok(item.map_or(Value::Null, |item| item.as_ref().clone()))
            },
            (Operation::FetchCollection, DispatchRequest::Fetch(request)) => {
                let items = handle.fetch_collection(&request).await?;
                Ok(Value::Array(items.to_vec()))
            },
            (Operation::FetchStatic, DispatchRequest::Fetch(request)) => {
                let item = handle.fetch_static(&request).await?;
                Ok(item.map_or(Value::Null, |item| item.as_ref().clone()))
            },
            (Operation::FetchStaticCollection, DispatchRequest::StaticBatch(request)) => {
                let report = handle.fetch_static_collection(&request).await?;
                serde_json::to_value(report).map_err(StoreError::from)
            },
            _ => Err(StoreError::configuration(format!("request does not fit '{action}'"))),
        }
    }
}
