//! Reqwest-backed client for the external document store.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeouts, and mapping HTTP failures into
//! [`PersistenceError`] variants. The store itself is opaque; its entire
//! contract is `query`/`insert`/`update`/`delete` per collection plus a
//! schema upload, with exact-match filters, a single sign-prefixed sort
//! field, and an optional result limit.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ports::PersistenceError;

use super::schema::Schema;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the external store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store service, without a trailing slash.
    pub base_url: String,
    /// Bearer token presented on every request.
    pub api_key: String,
}

/// Exact-match query over one collection.
///
/// # Examples
/// ```
/// use backend::outbound::store::Query;
///
/// let query = Query::new()
///     .with_filter("status", "open")
///     .sorted_desc("createdAt")
///     .with_limit(10);
/// assert_eq!(query.sort(), Some("-createdAt"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct Query {
    filter: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
}

impl Query {
    /// An unfiltered query returning every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match conjunct for a field.
    pub fn with_filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_owned(), value.into());
        self
    }

    /// Sort ascending by a single field.
    pub fn sorted_asc(mut self, field: &str) -> Self {
        self.sort = Some(field.to_owned());
        self
    }

    /// Sort descending by a single field (leading-sign convention).
    pub fn sorted_desc(mut self, field: &str) -> Self {
        self.sort = Some(format!("-{field}"));
        self
    }

    /// Truncate the result set; absence returns all matches.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The encoded sort directive, if any.
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }
}

/// Error body returned by the store on non-2xx responses.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    field: Option<String>,
}

/// Thin client for the store's HTTP API.
///
/// Constructed once at startup and shared via the repository adapters; no
/// process-wide singleton.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    /// Build a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: StoreConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn with_timeout(config: StoreConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Upload the declared collection schemas.
    ///
    /// The store validates writes against the most recently uploaded
    /// declaration, so this runs once at startup before serving traffic.
    pub async fn ensure_schema(&self, schema: &Schema) -> Result<(), PersistenceError> {
        let response = self
            .client
            .put(self.url("/v1/schema"))
            .bearer_auth(&self.api_key)
            .json(schema)
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(|_| ())
    }

    /// Run an exact-match query against a collection.
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<T>, PersistenceError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/collections/{collection}/query")))
            .bearer_auth(&self.api_key)
            .json(query)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(check(response).await?).await
    }

    /// Insert a document, returning the stored record with its assigned id
    /// and timestamps.
    pub async fn insert<T: DeserializeOwned>(
        &self,
        collection: &str,
        document: &impl Serialize,
    ) -> Result<T, PersistenceError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/collections/{collection}")))
            .bearer_auth(&self.api_key)
            .json(document)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(check(response).await?).await
    }

    /// Apply a partial update to a document by id.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &impl Serialize,
    ) -> Result<(), PersistenceError> {
        let response = self
            .client
            .patch(self.url(&format!("/v1/collections/{collection}/{id}")))
            .bearer_auth(&self.api_key)
            .json(patch)
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(|_| ())
    }

    /// Remove a document by id.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), PersistenceError> {
        let response = self
            .client
            .delete(self.url(&format!("/v1/collections/{collection}/{id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(|_| ())
    }
}

fn map_transport_error(err: reqwest::Error) -> PersistenceError {
    if err.is_connect() || err.is_timeout() {
        PersistenceError::connection(err.to_string())
    } else {
        PersistenceError::backend(err.to_string())
    }
}

/// Translate a non-success response into the store's failure taxonomy.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, PersistenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: StoreErrorBody = response.json().await.unwrap_or_else(|_| StoreErrorBody {
        code: String::new(),
        message: status.to_string(),
        field: None,
    });
    Err(classify(status, body))
}

fn classify(status: StatusCode, body: StoreErrorBody) -> PersistenceError {
    match (status, body.code.as_str()) {
        (_, "unique_violation") => {
            PersistenceError::conflict(body.field.unwrap_or_else(|| "unknown".to_owned()))
        }
        (_, "validation_failed") => PersistenceError::invalid(body.message),
        (StatusCode::NOT_FOUND, _) => PersistenceError::NotFound,
        (StatusCode::CONFLICT, _) => {
            PersistenceError::conflict(body.field.unwrap_or_else(|| "unknown".to_owned()))
        }
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            PersistenceError::invalid(body.message)
        }
        _ => PersistenceError::backend(format!("{status}: {}", body.message)),
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PersistenceError> {
    response
        .json()
        .await
        .map_err(|err| PersistenceError::backend(format!("invalid store response: {err}")))
}
