//! # Query Transport
//!
//! Sends GraphQL documents and REST requests to the Strapi CMS and returns the decoded JSON
//! document. The transport never looks inside the payload: GraphQL `errors` arrays are left to
//! the caller, non-2xx answers become [`TransportError::Status`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use scms_transport::{GraphqlClient, QueryBody, QueryTransport, TransportError};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), TransportError> {
//! let client = GraphqlClient::builder().url("https://cms.example.com").build()?;
//!
//! let body = QueryBody::from("query($slug: String!) { articles(where: {slug: $slug}) { id } }");
//! let response = client.query(&body, &json!({ "slug": "hello" })).await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod query;

pub use client::{GraphqlClient, GraphqlClientBuilder};
pub use error::{TransportError, TransportErrorExt};
pub use query::{Argument, Field, GraphqlQuery, QueryBody};

use serde_json::Value;
use std::future::Future;

/// The seam between the content store and the network.
///
/// Each call performs exactly one request; nothing is retried.
pub trait QueryTransport: Send + Sync + 'static {
    /// POSTs `{ query, variables }` to the GraphQL endpoint and returns the whole response
    /// document (`data` and `errors` included).
    fn query(
        &self,
        body: &QueryBody,
        variables: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// GETs a CMS-relative REST resource and returns the decoded JSON.
    fn get_json(&self, path: &str) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// Joins a CMS-relative path (e.g. an upload URL) onto the base URL.
    fn resolve(&self, path: &str) -> String;
}
