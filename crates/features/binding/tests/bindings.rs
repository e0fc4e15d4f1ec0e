//! Lifecycle hooks of item, collection and static bindings.

mod support;

use parking_lot::Mutex;
use scms_binding::{
    BindingOptions, CollectionBinding, FetchOutcome, ItemBinding, QuerySpec, StaticBinding,
};
use scms_domain::{PersistPolicy, PersistenceKey, ViewContext};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{store, tagged_store};

fn article_query(view: &ViewContext) -> QuerySpec {
    QuerySpec::new("query($path: String!) { articles(where: {path: $path}) { id } }")
        .variables(json!({ "path": view.route() }))
}

fn list_query(_: &ViewContext) -> QuerySpec {
    QuerySpec::new("{ articles { id } }")
}

#[test]
fn unknown_types_fail_at_creation() {
    let (store, _) = store();

    let err = ItemBinding::new(&store, "comment", BindingOptions::default(), list_query)
        .expect_err("unknown type");
    assert!(err.is_configuration());

    let err = CollectionBinding::new(&store, "homepage", BindingOptions::default(), list_query)
        .expect_err("single type has no collection");
    assert!(err.is_configuration());

    let err = StaticBinding::new(&store, "homepage", BindingOptions::default(), list_query)
        .expect_err("single type has no statics");
    assert!(err.is_configuration());
}

#[test]
fn item_bindings_register_type_tags_on_creation() {
    let (store, transport, tags) = tagged_store();

    ItemBinding::new(&store, "article", BindingOptions::default(), article_query).expect("binding");

    assert!(tags.contains("S"));
    assert!(tags.contains("S:article"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn item_mount_fetches_then_stays_fresh() {
    let (store, transport) = store();
    transport.always(json!({ "data": { "articles": [{ "id": 1 }] } }));
    let binding =
        ItemBinding::new(&store, "article", BindingOptions::default(), article_query).expect("binding");
    let view = ViewContext::at("/blog/hello");

    assert_eq!(binding.mount(&view).await.expect("mount"), FetchOutcome::Fetched);
    assert_eq!(binding.mount(&view).await.expect("remount"), FetchOutcome::Fresh);
    assert_eq!(transport.calls(), 1);

    let (_, variables) = transport.last_query().expect("query");
    assert_eq!(variables, json!({ "path": "/blog/hello" }));
    assert_eq!(binding.snapshot().as_deref(), Some(&json!({ "id": 1 })));
    assert_eq!(store.slice("article").expect("slice").item_key(), Some(PersistenceKey::from("/blog/hello")));
}

#[tokio::test]
async fn item_navigation_refetches_only_on_key_change() {
    let (store, transport) = store();
    transport.always(json!({ "data": { "article": { "id": 1 } } }));
    let binding =
        ItemBinding::new(&store, "article", BindingOptions::default(), article_query).expect("binding");

    binding.mount(&ViewContext::at("/a")).await.expect("mount");
    assert_eq!(binding.navigate(&ViewContext::at("/a")).await.expect("same"), FetchOutcome::Fresh);
    assert_eq!(binding.navigate(&ViewContext::at("/b")).await.expect("new"), FetchOutcome::Fetched);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn component_policy_survives_navigation() {
    let (store, transport) = store();
    transport.always(json!({ "data": { "article": { "id": 1 } } }));
    let options = BindingOptions::default().persist(PersistPolicy::Component);
    let binding = ItemBinding::new(&store, "article", options, list_query).expect("binding");

    binding.mount(&ViewContext::at("/a").component("Sidebar")).await.expect("mount");
    let outcome = binding.navigate(&ViewContext::at("/b").component("Sidebar")).await.expect("nav");

    assert_eq!(outcome, FetchOutcome::Fresh);
    assert_eq!(binding.persistence_key(&ViewContext::at("/b")), PersistenceKey::from("/b"));
}

#[tokio::test]
async fn on_demand_bindings_only_load_explicitly() {
    let (store, transport) = store();
    let binding = ItemBinding::new(&store, "article", BindingOptions::default().on_demand(), list_query)
        .expect("binding");
    let view = ViewContext::at("/");

    assert_eq!(binding.prefetch(&view).await.expect("prefetch"), FetchOutcome::Deferred);
    assert_eq!(binding.mount(&view).await.expect("mount"), FetchOutcome::Deferred);
    assert_eq!(binding.navigate(&view).await.expect("navigate"), FetchOutcome::Deferred);
    assert_eq!(transport.calls(), 0);

    assert_eq!(binding.fetch(&view).await.expect("fetch"), FetchOutcome::Fetched);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn errors_reach_the_handler_and_the_caller() {
    let (store, transport) = store();
    transport.fail(500);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let binding = ItemBinding::new(&store, "article", BindingOptions::default(), list_query)
        .expect("binding")
        .on_error(move |err| sink.lock().push(err.to_string()));

    let err = binding.mount(&ViewContext::at("/broken")).await.expect_err("HTTP 500");

    assert_eq!(seen.lock().len(), 1);
    assert_eq!(seen.lock()[0], err.to_string());
    assert!(!binding.is_loading(), "loading flag cleared after failure");
    assert!(binding.snapshot().is_none());
}

#[tokio::test]
async fn overlapping_fetches_of_one_binding_are_ignored() {
    let (store, transport) = store();
    let gate = transport.hold();
    let binding =
        ItemBinding::new(&store, "article", BindingOptions::default(), list_query).expect("binding");

    let first = tokio::spawn({
        let binding = binding.clone();
        async move { binding.fetch(&ViewContext::at("/")).await }
    });
    while !binding.is_loading() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(binding.fetch(&ViewContext::at("/")).await.expect("second"), FetchOutcome::InFlight);

    gate.notify_one();
    assert_eq!(first.await.expect("join").expect("first"), FetchOutcome::Fetched);
    assert!(!binding.is_loading());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn collection_mount_refetches_empty_collections() {
    let (store, transport) = store();
    transport
        .reply(json!({ "data": { "articles": [] } }))
        .reply(json!({ "data": { "articles": [{ "id": 1 }] } }));
    let binding = CollectionBinding::new(&store, "articles", BindingOptions::default(), list_query)
        .expect("binding");
    let view = ViewContext::at("/blog");

    assert_eq!(binding.mount(&view).await.expect("mount"), FetchOutcome::Fetched);
    assert_eq!(binding.navigate(&view).await.expect("nav"), FetchOutcome::Fresh);
    assert_eq!(binding.mount(&view).await.expect("remount"), FetchOutcome::Fetched);
    assert_eq!(binding.mount(&view).await.expect("fresh"), FetchOutcome::Fresh);
    assert_eq!(binding.snapshot().len(), 1);
}

#[tokio::test]
async fn collection_failure_leaves_empty_list_under_attempted_key() {
    let (store, transport) = store();
    transport.fail(500);
    let binding = CollectionBinding::new(&store, "article", BindingOptions::default(), list_query)
        .expect("binding");

    binding.prefetch(&ViewContext::at("/blog")).await.expect_err("HTTP 500");

    assert!(binding.snapshot().is_empty());
    assert_eq!(binding.slice().collection_key(), Some(PersistenceKey::from("/blog")));
}

#[tokio::test]
async fn static_mount_prefers_cached_entry() {
    let (store, transport) = store();
    let options = BindingOptions::default().persist(PersistPolicy::Explicit("footer".into()));
    let binding = StaticBinding::new(&store, "article", options, list_query).expect("binding");
    binding.slice().set_static(Some(json!({ "id": 9 })), "footer").expect("seed");

    assert_eq!(binding.mount(&ViewContext::at("/")).await.expect("mount"), FetchOutcome::Fresh);
    assert_eq!(binding.snapshot().as_deref(), Some(&json!({ "id": 9 })));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn static_fetch_loads_and_force_refreshes() {
    let (store, transport) = store();
    transport
        .reply(json!({ "data": { "article": { "id": 1 } } }))
        .reply(json!({ "data": { "article": { "id": 2 } } }));
    let options = BindingOptions::default().persist(PersistPolicy::Component);
    let binding = StaticBinding::new(&store, "articles", options, list_query).expect("binding");
    let view = ViewContext::at("/").component("Promo");

    assert_eq!(binding.mount(&view).await.expect("mount"), FetchOutcome::Fetched);
    assert_eq!(binding.fetch(&view, false).await.expect("cached"), FetchOutcome::Fresh);
    assert_eq!(binding.fetch(&view, true).await.expect("forced"), FetchOutcome::Fetched);

    assert_eq!(binding.snapshot().as_deref(), Some(&json!({ "id": 2 })));
    assert_eq!(binding.slice().static_keys(), vec![PersistenceKey::from("Promo")]);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn static_bindings_require_a_key() {
    let (store, transport) = store();
    let binding =
        StaticBinding::new(&store, "article", BindingOptions::default(), list_query).expect("binding");

    let err = binding.mount(&ViewContext::at("")).await.expect_err("no key");

    assert!(err.is_configuration());
    assert_eq!(transport.calls(), 0);
    assert!(!binding.is_loading());
}
