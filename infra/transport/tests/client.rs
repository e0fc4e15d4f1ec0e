//! Transport integration tests.
//!
//! Starts an axum server standing in for the CMS and exercises it with the real client.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use scms_transport::{
    Argument, Field, GraphqlClient, GraphqlQuery, QueryBody, QueryTransport, TransportError,
};
use serde_json::{Value, json};

fn header(headers: &HeaderMap, name: &axum::http::HeaderName) -> String {
    headers.get(name).and_then(|value| value.to_str().ok()).unwrap_or_default().to_owned()
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "data": {
            "echo": body,
            "accept": header(&headers, &ACCEPT),
            "contentType": header(&headers, &CONTENT_TYPE),
        }
    }))
}

async fn graphql_errors() -> Json<Value> {
    Json(json!({ "data": null, "errors": [{ "message": "boom" }] }))
}

async fn articles() -> Json<Value> {
    Json(json!([{ "id": 1, "title_en": "Hello" }]))
}

async fn fail() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

/// Bind to port 0 and return the actual address.
async fn start_server() -> String {
    let app = Router::new()
        .route("/graphql", post(echo))
        .route("/graphql-errors", post(graphql_errors))
        .route("/api/articles", get(articles))
        .route("/fail", get(fail).post(fail))
        .route("/maintenance", get(not_json));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client(base: &str, path: &str) -> GraphqlClient {
    GraphqlClient::builder().url(base).graphql_path(path).build().expect("client")
}

#[tokio::test]
async fn posts_query_and_variables_as_json() {
    let base = start_server().await;
    let client = client(&base, "/graphql");

    let body = QueryBody::from("query($id: ID!) { article(id: $id) { id } }");
    let response = client.query(&body, &json!({ "id": "7" })).await.expect("query");

    let data = &response["data"];
    assert_eq!(data["echo"]["query"], "query($id: ID!) { article(id: $id) { id } }");
    assert_eq!(data["echo"]["variables"], json!({ "id": "7" }));
    assert_eq!(data["accept"], "application/json");
    assert_eq!(data["contentType"], "application/json");
}

#[tokio::test]
async fn null_variables_are_sent_as_empty_object() {
    let base = start_server().await;
    let client = client(&base, "/graphql");

    let response = client.query(&"{ homepage { id } }".into(), &Value::Null).await.expect("query");
    assert_eq!(response["data"]["echo"]["variables"], json!({}));
}

#[tokio::test]
async fn structured_queries_are_rendered_before_sending() {
    let base = start_server().await;
    let client = client(&base, "/graphql");

    let query = GraphqlQuery::named("Posts")
        .variable("limit", "Int")
        .field(Field::new("posts").arg("limit", Argument::variable("limit")).select(["id"]));
    let response = client.query(&query.into(), &json!({ "limit": 2 })).await.expect("query");

    assert_eq!(
        response["data"]["echo"]["query"],
        "query Posts($limit: Int) { posts(limit: $limit) { id } }"
    );
}

#[tokio::test]
async fn graphql_errors_are_returned_untouched() {
    let base = start_server().await;
    let client = client(&base, "/graphql-errors");

    let response = client.query(&"{ x }".into(), &json!({})).await.expect("2xx is a success");
    assert_eq!(response["errors"][0]["message"], "boom");
}

#[tokio::test]
async fn non_success_status_is_a_status_error() {
    let base = start_server().await;
    let client = client(&base, "/fail");

    let err = client.query(&"{ x }".into(), &json!({})).await.expect_err("500 must fail");
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500 Internal Server Error"), "got: {err}");
}

#[tokio::test]
async fn get_json_reads_rest_resources() {
    let base = start_server().await;
    let client = client(&base, "/graphql");

    let items = client.get_json("/api/articles").await.expect("rest");
    assert_eq!(items, json!([{ "id": 1, "title_en": "Hello" }]));

    let err = client.get_json("fail").await.expect_err("500 must fail");
    assert!(matches!(err, TransportError::Status { status: 500, .. }));
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let base = start_server().await;
    let client = client(&base, "/graphql");

    let err = client.get_json("/maintenance").await.expect_err("html is not json");
    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client(&format!("http://{addr}"), "/graphql");
    let err = client.query(&"{ x }".into(), &json!({})).await.expect_err("nothing listens");
    assert!(matches!(err, TransportError::Request { .. }));
}
