//! Dataset fetching with failure isolation.
//!
//! A fetch never fails from the caller's point of view: transport errors,
//! non-success statuses and undecodable bodies are logged and turned into an
//! empty [`FetchResult`] with `ok == false`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::plate::Kenteken;
use crate::rdw::dataset::Dataset;

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Records returned by one dataset for one plate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    /// The dataset that was queried.
    pub dataset: Dataset,
    /// Records in provider order. Empty when `ok` is false.
    pub records: Vec<Value>,
    /// Whether the provider was reached and answered with valid JSON.
    pub ok: bool,
}

impl FetchResult {
    /// A successful fetch.
    #[must_use]
    pub const fn success(dataset: Dataset, records: Vec<Value>) -> Self {
        Self {
            dataset,
            records,
            ok: true,
        }
    }

    /// A failed fetch: no records.
    #[must_use]
    pub const fn failed(dataset: Dataset) -> Self {
        Self {
            dataset,
            records: Vec::new(),
            ok: false,
        }
    }

    /// Returns `true` when there are no records, whatever the reason.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Source of dataset records.
///
/// Implementations must absorb every failure into [`FetchResult::failed`].
#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Fetches all records of `dataset` for `kenteken`.
    async fn fetch(&self, dataset: Dataset, kenteken: &Kenteken) -> FetchResult;
}

/// Fetcher backed by the RDW open-data HTTP API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Queries `url` with `kenteken` as the `kenteken` query parameter.
    ///
    /// A body that is empty or not a JSON array yields no records.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a body
    /// that is not valid JSON.
    pub async fn get_records(&self, url: &str, kenteken: &Kenteken) -> Result<Vec<Value>, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&[("kenteken", kenteken.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&body)? {
            Value::Array(records) => Ok(records),
            other => {
                tracing::debug!(url, kind = json_kind(&other), "Non-array body, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl DataFetcher for HttpFetcher {
    async fn fetch(&self, dataset: Dataset, kenteken: &Kenteken) -> FetchResult {
        match self.get_records(&dataset.endpoint(), kenteken).await {
            Ok(records) => {
                tracing::debug!(%dataset, %kenteken, count = records.len(), "Fetched records");
                FetchResult::success(dataset, records)
            }
            Err(e) => {
                tracing::warn!(%dataset, %kenteken, error = %e, "RDW fetch failed");
                FetchResult::failed(dataset)
            }
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
