//! `OmdbClient` - OMDb API client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::types::{MovieDetail, SearchParams, SearchResponse, SeasonResponse};
use crate::cache::DetailCache;
use crate::retry::{RetryPolicy, retry_with_backoff};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default timeout of a single request attempt.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OMDb API client.
///
/// Every request is retried with exponential backoff; detail lookups
/// through [`LocalOmdbApi::get_detail`] go through the shared
/// [`DetailCache`].
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
    /// Retry schedule applied to every request.
    retry_policy: RetryPolicy,
    /// Detail cache.
    cache: Arc<DetailCache>,
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry_policy", &self.retry_policy)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    cache: Option<Arc<DetailCache>>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
            retry_policy: None,
            cache: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-attempt request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy (default: 3 attempts, 1s base delay).
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Injects the detail cache (default: a fresh 500 entry / 10 min cache).
    #[must_use]
    pub fn cache(mut self, cache: Arc<DetailCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
            retry_policy: self.retry_policy.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Detail cache used by `get_detail`.
    #[must_use]
    pub const fn cache(&self) -> &Arc<DetailCache> {
        &self.cache
    }

    /// Sends a GET request with the API key and query params, retrying
    /// transient failures according to the retry policy.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        retry_with_backoff(&self.retry_policy, || self.get_json_once(query)).await
    }

    /// Single request attempt. Non-success status, timeout, network and
    /// decoding failures are all errors.
    async fn get_json_once<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build request")?;

        tracing::debug!(params = ?query, "OMDb API request");

        let result = self.http_client.execute(request).await;
        let response = result.context("OMDb request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            bail!("OMDb API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.context("failed to decode JSON response")?;
        Ok(parsed)
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = params.page))]
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let response: SearchResponse = self.get_json(&params.to_query()).await?;
        if !response.success {
            tracing::debug!(
                error = response.error.as_deref().unwrap_or("-"),
                "OMDb search returned no results"
            );
        }
        Ok(response)
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail> {
        let query = [("i", String::from(imdb_id)), ("plot", String::from("short"))];
        self.get_json(&query).await
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    async fn get_detail(&self, imdb_id: &str) -> Option<MovieDetail> {
        if let Some(detail) = self.cache.get(imdb_id) {
            tracing::debug!("Detail cache hit");
            return Some(detail);
        }

        match self.fetch_detail(imdb_id).await {
            Ok(detail) if detail.success => {
                self.cache.set(imdb_id, detail.clone());
                Some(detail)
            }
            Ok(detail) => {
                tracing::warn!(
                    error = detail.error.as_deref().unwrap_or("-"),
                    "OMDb returned no detail"
                );
                None
            }
            Err(err) => {
                tracing::warn!("Failed to fetch detail: {err:#}");
                None
            }
        }
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id, season = season))]
    async fn fetch_season(&self, imdb_id: &str, season: u32) -> Result<SeasonResponse> {
        let query = [("i", String::from(imdb_id)), ("Season", season.to_string())];
        self.get_json(&query).await
    }
}
