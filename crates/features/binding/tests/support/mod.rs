//! Scripted stand-in for the CMS.
#![allow(dead_code)]

use parking_lot::Mutex;
use scms_domain::config::ContentTypeConfig;
use scms_registry::TypeRegistry;
use scms_store::{CacheTagSet, CacheTagSink, ContentStore};
use scms_transport::{QueryBody, QueryTransport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
enum Reply {
    Json(Value),
    Status(u16),
}

/// Answers queued replies in order, then the fallback (`{"data": null}` by default).
///
/// Clones share the script and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Script>,
}

#[derive(Debug, Default)]
struct Script {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<Value>>,
    queries: Mutex<Vec<(String, Value)>>,
    paths: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, value: Value) -> &Self {
        self.inner.replies.lock().push_back(Reply::Json(value));
        self
    }

    pub fn fail(&self, status: u16) -> &Self {
        self.inner.replies.lock().push_back(Reply::Status(status));
        self
    }

    pub fn always(&self, value: Value) -> &Self {
        *self.inner.fallback.lock() = Some(value);
        self
    }

    /// Holds every following query until the returned gate is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.inner.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> usize {
        self.inner.queries.lock().len() + self.inner.paths.lock().len()
    }

    pub fn last_query(&self) -> Option<(String, Value)> {
        self.inner.queries.lock().last().cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.inner.paths.lock().clone()
    }

    fn next(&self) -> Result<Value, TransportError> {
        match self.inner.replies.lock().pop_front() {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(TransportError::Status {
                status,
                reason: "Scripted failure".into(),
                context: None,
            }),
            None => Ok(self
                .inner
                .fallback
                .lock()
                .clone()
                .unwrap_or_else(|| serde_json::json!({ "data": null }))),
        }
    }
}

impl QueryTransport for MockTransport {
    async fn query(&self, body: &QueryBody, variables: &Value) -> Result<Value, TransportError> {
        self.inner.queries.lock().push((body.render().into_owned(), variables.clone()));
        let gate = self.inner.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.next()
    }

    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        self.inner.paths.lock().push(path.to_owned());
        self.next()
    }

    fn resolve(&self, path: &str) -> String {
        format!("http://cms.test{path}")
    }
}

pub fn registry() -> TypeRegistry {
    TypeRegistry::build(&[
        ContentTypeConfig::collection("article"),
        ContentTypeConfig::single("homepage"),
    ])
    .expect("registry")
}

pub fn store() -> (ContentStore<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    (ContentStore::new(registry(), transport.clone()), transport)
}

pub fn tagged_store() -> (ContentStore<MockTransport>, MockTransport, Arc<CacheTagSet>) {
    let transport = MockTransport::new();
    let tags = Arc::new(CacheTagSet::new());
    let store = ContentStore::builder(registry(), transport.clone())
        .tag_sink(Arc::clone(&tags) as Arc<dyn CacheTagSink>)
        .build();
    (store, transport, tags)
}
