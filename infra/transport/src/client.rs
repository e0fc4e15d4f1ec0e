use crate::error::{TransportError, TransportErrorExt};
use crate::query::QueryBody;
use crate::QueryTransport;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Response, Url};
use scms_domain::config::{DEFAULT_GRAPHQL_PATH, StrapiConfig};
use scms_kernel::url::join_url;
use serde_json::{Value, json};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

const JSON_MIME: &str = "application/json";

/// Inner state of the [`GraphqlClient`] handle.
#[derive(Debug)]
pub struct GraphqlClientInner {
    http: Client,
    base_url: String,
    endpoint: String,
}

impl GraphqlClientInner {
    /// CMS base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// HTTP transport to a Strapi instance. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    inner: Arc<GraphqlClientInner>,
}

impl GraphqlClient {
    /// Creates a new [`GraphqlClientBuilder`].
    pub fn builder() -> GraphqlClientBuilder {
        GraphqlClientBuilder::new()
    }

    /// Builds a client from the `strapi` configuration section.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidUrl`] when the configured URL does not parse.
    pub fn from_config(config: &StrapiConfig) -> Result<Self, TransportError> {
        let builder = Self::builder().url(&config.url).graphql_path(&config.graphql_path);
        match config.timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)).build(),
            None => builder.build(),
        }
    }
}

impl Deref for GraphqlClient {
    type Target = GraphqlClientInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A fluent builder for [`GraphqlClient`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct GraphqlClientBuilder {
    url: Option<String>,
    graphql_path: String,
    timeout: Option<Duration>,
}

impl Default for GraphqlClientBuilder {
    fn default() -> Self {
        Self { url: None, graphql_path: DEFAULT_GRAPHQL_PATH.to_owned(), timeout: None }
    }
}

impl GraphqlClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CMS base URL (e.g. `https://cms.example.com`).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Overrides the GraphQL path, `/graphql` by default.
    pub fn graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    /// Sets a per-request timeout. Without it, the HTTP client default applies.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the settings and creates the HTTP client.
    ///
    /// # Errors
    /// * [`TransportError::InvalidUrl`] if the URL is missing or not an absolute `http(s)` URL.
    /// * [`TransportError::Request`] if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<GraphqlClient, TransportError> {
        let url = self.url.ok_or(TransportError::InvalidUrl {
            message: "CMS URL is required".into(),
            context: None,
        })?;

        let parsed = Url::parse(&url).map_err(|e| TransportError::InvalidUrl {
            message: e.to_string().into(),
            context: Some(url.clone().into()),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                message: format!("unsupported scheme '{}'", parsed.scheme()).into(),
                context: Some(url.into()),
            });
        }

        let base_url = url.trim_end_matches('/').to_owned();
        let endpoint = join_url(&base_url, &self.graphql_path);

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().context("Building HTTP client")?;

        debug!(%endpoint, "GraphQL client ready");

        Ok(GraphqlClient { inner: Arc::new(GraphqlClientInner { http, base_url, endpoint }) })
    }
}

impl QueryTransport for GraphqlClient {
    #[instrument(skip_all, fields(endpoint = %self.inner.endpoint))]
    async fn query(&self, body: &QueryBody, variables: &Value) -> Result<Value, TransportError> {
        let query = body.render();
        let empty = json!({});
        let variables = if variables.is_null() { &empty } else { variables };

        debug!(query = %query, variables = %variables, "Performing query");

        let response = self
            .inner
            .http
            .post(&self.inner.endpoint)
            .header(ACCEPT, HeaderValue::from_static(JSON_MIME))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .context("Sending GraphQL request")?;

        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let url = join_url(&self.inner.base_url, path);

        debug!(%url, "Fetching REST resource");

        let response = self
            .inner
            .http
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static(JSON_MIME))
            .send()
            .await
            .context("Sending REST request")?;

        read_json(response).await
    }

    fn resolve(&self, path: &str) -> String {
        join_url(&self.inner.base_url, path)
    }
}

async fn read_json(response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        error!(status = status.as_u16(), reason, "CMS request failed");
        return Err(TransportError::Status {
            status: status.as_u16(),
            reason: reason.into(),
            context: Some(response.url().path().to_owned().into()),
        });
    }

    let bytes = response.bytes().await.context("Reading response body")?;
    serde_json::from_slice::<Value>(&bytes).context("Decoding response body")
}
