//! Slice reads, mutations, the module surface and change subscriptions.

mod support;

use scms_domain::PersistenceKey;
use scms_store::{ChangeTarget, MutationPayload, StoreError, NAMESPACE};
use serde::Deserialize;
use serde_json::json;
use support::store;

#[derive(Debug, Deserialize, PartialEq)]
struct Article {
    id: u32,
    title: String,
}

#[test]
fn slices_start_empty() {
    let (store, _) = store();
    let articles = store.slice("articles").expect("articles");

    assert!(articles.item().is_none());
    assert!(articles.item_key().is_none());
    assert!(articles.collection().is_empty());
    assert!(articles.collection_key().is_none());
    assert!(articles.static_keys().is_empty());
}

#[test]
fn singular_and_plural_names_share_one_slice() {
    let (store, _) = store();
    store.slice("article").expect("article").set_item(Some(json!({ "id": 1 })), "/a");

    let item = store.slice("articles").expect("articles").item().expect("item");
    assert_eq!(*item, json!({ "id": 1 }));
    assert_eq!(store.slices().count(), 3);
}

#[test]
fn unknown_types_are_configuration_errors() {
    let (store, _) = store();
    let err = store.slice("comments").expect_err("unknown type");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("comments"));
}

#[test]
fn mutations_replace_value_and_key_together() {
    let (store, _) = store();
    let articles = store.slice("article").expect("article");

    articles.set_item(Some(json!({ "id": 1, "title": "One" })), "/one");
    articles.set_collection(vec![json!({ "id": 2, "title": "Two" })], "/list").expect("set");

    assert_eq!(articles.item_key(), Some(PersistenceKey::from("/one")));
    assert_eq!(articles.collection_key(), Some(PersistenceKey::from("/list")));
    assert_eq!(
        articles.item_as::<Article>().expect("decode"),
        Some(Article { id: 1, title: "One".into() })
    );
    assert_eq!(
        articles.collection_as::<Article>().expect("decode"),
        vec![Article { id: 2, title: "Two".into() }]
    );

    articles.set_item(None, "/gone");
    assert!(articles.item().is_none());
    assert_eq!(articles.item_key(), Some(PersistenceKey::from("/gone")));
}

#[test]
fn typed_reads_report_decode_errors() {
    let (store, _) = store();
    let articles = store.slice("article").expect("article");
    articles.set_item(Some(json!({ "id": "not a number" })), "/x");

    let err = articles.item_as::<Article>().expect_err("mismatch");
    assert!(matches!(err, StoreError::Decode { .. }));
}

#[test]
fn static_entries_are_independent() {
    let (store, _) = store();
    let articles = store.slice("articles").expect("articles");

    articles.set_static(Some(json!({ "id": 1 })), "/a").expect("static a");
    articles.set_static(Some(json!({ "id": 2 })), "/b").expect("static b");
    articles.set_static(Some(json!({ "id": 3 })), "/a").expect("overwrite a");

    assert_eq!(*articles.static_item("/a").expect("a"), json!({ "id": 3 }));
    assert_eq!(*articles.static_item("/b").expect("b"), json!({ "id": 2 }));

    articles.set_static(None, "/a").expect("remove a");
    assert!(articles.static_item("/a").is_none());
    assert_eq!(articles.static_keys(), vec![PersistenceKey::from("/b")]);
}

#[test]
fn single_types_reject_collection_operations() {
    let (store, _) = store();
    let homepage = store.slice("homepage").expect("homepage");

    homepage.set_item(Some(json!({ "hero": "Welcome" })), "/");
    assert!(homepage.set_collection(vec![], "/").expect_err("no collection").is_configuration());
    assert!(homepage.set_static(None, "/").expect_err("no statics").is_configuration());
    assert!(homepage.collection().is_empty());
}

#[test]
fn freshness_compares_keys_only() {
    let (store, _) = store();
    let articles = store.slice("article").expect("article");
    let key = PersistenceKey::from("/blog/hello");

    assert!(!articles.is_item_fresh(&key));
    articles.set_item(Some(json!({ "id": 1 })), key.clone());
    assert!(articles.is_item_fresh(&key));
    assert!(!articles.is_item_fresh(&PersistenceKey::from("/blog/other")));

    articles.set_item(None, key.clone());
    assert!(!articles.is_item_fresh(&key), "an empty item is never fresh");

    articles.set_collection(vec![], "/blog").expect("set");
    assert!(articles.is_collection_fresh(&PersistenceKey::from("/blog")));
}

#[test]
fn manifest_lists_namespaced_identifiers() {
    let (store, _) = store();
    let manifest = store.manifest();

    assert_eq!(manifest.namespace, NAMESPACE);
    for state_key in ["article", "articles", "articlesStatic", "articlePersistenceKey", "homepage"] {
        assert!(manifest.state.iter().any(|key| key == state_key), "{state_key}");
    }
    for mutation in ["strapi/SET_ARTICLE", "strapi/SET_ARTICLES", "strapi/SET_BLOG_POSTS_STATIC"] {
        assert!(manifest.mutations.iter().any(|id| id == mutation), "{mutation}");
    }
    for action in ["strapi/fetchArticle", "strapi/fetchBlogPostsStaticCollection", "strapi/fetchHomepage"] {
        assert!(manifest.actions.iter().any(|id| id == action), "{action}");
    }
    assert!(manifest.getters.iter().any(|id| id == "strapi/articlesStatic"));
    assert!(!manifest.actions.iter().any(|id| id == "strapi/fetchHomepages"));
}

#[test]
fn commit_routes_identifiers() {
    let (store, _) = store();

    store
        .commit(
            "strapi/SET_ARTICLES",
            MutationPayload::Collection { items: vec![json!({ "id": 1 })], persistence_key: "/blog".into() },
        )
        .expect("namespaced commit");
    store
        .commit(
            "SET_BLOG_POSTS_STATIC",
            MutationPayload::Item { item: Some(json!({ "slug": "hi" })), persistence_key: "hi".into() },
        )
        .expect("bare commit");

    let articles = store.slice("article").expect("article");
    assert_eq!(articles.collection().len(), 1);
    assert!(store.slice("blogPost").expect("posts").static_item("hi").is_some());
}

#[test]
fn commit_rejects_bad_identifiers_and_payloads() {
    let (store, _) = store();
    let item = || MutationPayload::Item { item: None, persistence_key: "/".into() };

    assert!(store.commit("SET_COMMENTS", item()).expect_err("unknown").is_configuration());
    assert!(store.commit("fetchArticle", item()).expect_err("action").is_configuration());
    assert!(store.commit("SET_ARTICLES", item()).expect_err("wrong payload").is_configuration());
}

#[test]
fn state_renders_every_slot() {
    let (store, _) = store();
    let articles = store.slice("article").expect("article");
    articles.set_item(Some(json!({ "id": 1 })), "/a");
    articles.set_static(Some(json!({ "id": 2 })), "two").expect("static");

    let state = store.state();
    assert_eq!(state["article"], json!({ "id": 1 }));
    assert_eq!(state["articlePersistenceKey"], json!("/a"));
    assert_eq!(state["articles"], json!([]));
    assert_eq!(state["articlesPersistenceKey"], json!(null));
    assert_eq!(state["articlesStatic"], json!({ "two": { "id": 2 } }));
    assert_eq!(state["homepage"], json!(null));
    assert!(state.get("homepages").is_none());
}

#[tokio::test]
async fn subscribers_see_every_mutation() {
    let (store, _) = store();
    let mut changes = store.subscribe();
    let articles = store.slice("articles").expect("articles");

    articles.set_item(Some(json!({ "id": 1 })), "/a");
    articles.set_static(Some(json!({ "id": 1 })), "one").expect("static");

    let first = changes.recv().await.expect("item change");
    assert_eq!(first.content_type, "article");
    assert_eq!(first.target, ChangeTarget::Item);
    assert_eq!(first.persistence_key.as_str(), "/a");

    let second = changes.recv().await.expect("static change");
    assert_eq!(second.target, ChangeTarget::Static);
    assert_eq!(second.persistence_key.as_str(), "one");
    assert!(changes.try_recv().is_none());
}

#[tokio::test]
async fn lagging_subscribers_skip_to_retained_changes() {
    let registry = support::registry();
    let store = scms_store::ContentStore::builder(registry, support::MockTransport::new())
        .change_capacity(2)
        .build();
    let mut changes = store.subscribe();
    let articles = store.slice("article").expect("article");

    for key in ["/1", "/2", "/3", "/4"] {
        articles.set_item(None, key);
    }

    assert_eq!(changes.recv().await.expect("change").persistence_key.as_str(), "/3");
    assert_eq!(changes.recv().await.expect("change").persistence_key.as_str(), "/4");
}

#[test]
fn mutations_without_subscribers_are_fine() {
    let (store, _) = store();
    let subscription = store.subscribe();
    drop(subscription);

    store.slice("article").expect("article").set_item(None, "/");
    assert!(format!("{store:?}").contains("ContentStore"));
}
