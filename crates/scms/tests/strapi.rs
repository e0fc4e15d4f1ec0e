//! The facade wired end to end against an axum server standing in for the CMS.

use axum::routing::{get, post};
use axum::{Json, Router};
use scms::binding::{BindingOptions, FetchOutcome, QuerySpec};
use scms::domain::ViewContext;
use scms::domain::config::{ContentTypeConfig, StrapiConfig};
use scms::store::{CacheTagSet, CacheTagSink};
use scms::{Strapi, StrapiError};
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;

async fn graphql(Json(body): Json<Value>) -> Json<Value> {
    let path = body["variables"]["path"].as_str().unwrap_or_default().to_owned();
    Json(json!({ "data": { "articles": [{ "id": 3, "path": path }] } }))
}

async fn pages() -> Json<Value> {
    Json(json!({ "title_pl": "Witaj", "title_en": "Welcome" }))
}

async fn start_server() -> String {
    let app = Router::new().route("/graphql", post(graphql)).route("/pages/home", get(pages));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn config(url: &str) -> StrapiConfig {
    let mut config = StrapiConfig::default();
    config.url = url.to_owned();
    config.types = vec![ContentTypeConfig::collection("article"), ContentTypeConfig::single("homepage")];
    config
}

fn article_query(view: &ViewContext) -> QuerySpec {
    QuerySpec::new("query($path: String!) { articles(where: {path: $path}) { id path } }")
        .variables(json!({ "path": view.route() }))
}

#[test]
fn resolves_types_by_any_name() {
    let strapi = Strapi::from_config(&config("http://localhost:1337")).expect("strapi");

    let singular = strapi.get_type("article").expect("article");
    let plural = strapi.get_type("articles").expect("articles");
    assert!(Arc::ptr_eq(singular, plural));
    assert!(strapi.get_type("comments").is_none());
    assert_eq!(strapi.resolve("/uploads/a.png"), "http://localhost:1337/uploads/a.png");
}

#[test]
fn invalid_configuration_fails_startup() {
    let mut duplicate = config("http://localhost:1337");
    duplicate.types.push(ContentTypeConfig::collection("articles"));
    let err = Strapi::from_config(&duplicate).expect_err("duplicate type");
    assert!(matches!(err, StrapiError::Registry { .. }));

    let err = Strapi::from_config(&config("not a url")).expect_err("invalid url");
    assert!(matches!(err, StrapiError::Transport { .. }));
}

#[test]
fn bindings_of_unknown_types_are_rejected() {
    let strapi = Strapi::from_config(&config("http://localhost:1337")).expect("strapi");

    let err = strapi.item("comment", BindingOptions::default(), article_query).expect_err("unknown");
    assert!(matches!(err, StrapiError::Store { .. }));
    assert!(strapi.collection("homepage", BindingOptions::default(), article_query).is_err());
}

#[tokio::test]
async fn item_binding_round_trip_registers_tags() {
    let base = start_server().await;
    let tags = Arc::new(CacheTagSet::new());
    let strapi = Strapi::builder(config(&base))
        .tag_sink(Arc::clone(&tags) as Arc<dyn CacheTagSink>)
        .build()
        .expect("strapi");

    let article = strapi.item("article", BindingOptions::default(), article_query).expect("binding");
    let outcome = article.mount(&ViewContext::at("/blog/hello")).await.expect("mount");

    assert_eq!(outcome, FetchOutcome::Fetched);
    assert_eq!(article.snapshot().expect("item")["path"], "/blog/hello");
    assert_eq!(strapi.store().state()["articlePersistenceKey"], "/blog/hello");
    assert!(tags.contains("S:article:3"));
}

#[tokio::test]
async fn rest_fallback_uses_configured_fields() {
    let base = start_server().await;
    let strapi = Strapi::from_config(&config(&base)).expect("strapi");
    let rest = strapi.rest();

    let page = rest.fetch("/pages/home", "pl").await.expect("rest");

    assert_eq!(page["title"], "Witaj");
    assert_eq!(page["title_en"], "Welcome");
}

#[test]
fn loads_application_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("tempfile");
    writeln!(
        file,
        r#"
[strapi]
url = "https://cms.example.com"

[[strapi.types]]
name = "article"

[[strapi.types]]
name = "homepage"
single = true
"#
    )
    .expect("write");

    let config = scms::load_config(Some(file.path())).expect("config");
    let strapi = Strapi::from_config(&config.strapi).expect("strapi");

    assert_eq!(strapi.registry().len(), 2);
    assert!(strapi.get_type("homepage").expect("homepage").is_single());
}
