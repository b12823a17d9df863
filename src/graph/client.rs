//! reqwest-backed GraphQL client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::query::{PAIRS_QUERY, candles_query};
use super::{CandleQuery, CandleSource, PairSource};
use crate::models::candle::CandlesData;
use crate::models::pair::PairsData;
use crate::models::{CandleRecord, PairRecord};
use crate::{Result, UdfError};

/// Standard GraphQL response envelope.
#[derive(Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphErrorMessage>,
}

#[derive(Deserialize)]
struct GraphErrorMessage {
    message: String,
}

/// Client for a single GraphQL endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GraphClient {
    url: String,
    http: reqwest::Client,
}

impl GraphClient {
    /// Creates a client for `url` whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`UdfError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `query` and decodes its `data` member.
    ///
    /// # Errors
    ///
    /// Returns [`UdfError::Http`] on transport failure or a non-success
    /// status, [`UdfError::Json`] if the body cannot be decoded, and
    /// [`UdfError::Upstream`] if the endpoint reports GraphQL errors or
    /// omits `data`.
    pub async fn execute<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        let body = serde_json::json!({ "query": query });
        let response = self.http.post(&self.url).json(&body).send().await?;
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;
        debug!(url = %self.url, bytes = bytes.len(), "GraphQL response received");

        let envelope: GraphResponse<T> = serde_json::from_slice(&bytes)?;
        decode_envelope(envelope)
    }
}

fn decode_envelope<T>(envelope: GraphResponse<T>) -> Result<T> {
    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(UdfError::Upstream(format!(
            "GraphQL error: {}",
            messages.join(", ")
        )));
    }
    envelope
        .data
        .ok_or_else(|| UdfError::Upstream("missing data in GraphQL response".into()))
}

#[async_trait]
impl PairSource for GraphClient {
    async fn fetch_pairs(&self) -> Result<Vec<PairRecord>> {
        let data: PairsData = self.execute(PAIRS_QUERY).await?;
        Ok(data.pairs)
    }
}

#[async_trait]
impl CandleSource for GraphClient {
    async fn fetch_candles(&self, query: &CandleQuery) -> Result<Vec<CandleRecord>> {
        let data: CandlesData = self.execute(&candles_query(query)).await?;
        Ok(data.candles)
    }
}
