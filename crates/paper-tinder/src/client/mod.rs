//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Response caching for GET requests (60 second TTL)
//!
//! Paper-listing calls return the raw JSON payload; shaping it into a paper
//! list is the gateway's job.

use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::Url;

use crate::config::{Config, api, fields};
use crate::error::{ClientError, ClientResult, UNPARSABLE_ERROR_BODY};
use crate::models::RawAuthorSearch;

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache.
    cache: Cache<String, serde_json::Value>,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,

    /// Recommendations API base URL.
    recommendations_api_url: String,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, "application/json".parse()?);

        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        } else {
            tracing::warn!(
                "No Semantic Scholar API key configured; requests go out unauthenticated"
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            api_key: config.api_key,
            graph_api_url: config.graph_api_url,
            recommendations_api_url: config.recommendations_api_url,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for authors by name.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_authors(&self, query: &str, limit: u32) -> ClientResult<RawAuthorSearch> {
        let url = format!("{}/author/search", self.graph_api_url);

        let params = vec![
            ("query".to_string(), query.to_string()),
            ("fields".to_string(), fields::AUTHOR.join(",")),
            ("limit".to_string(), limit.to_string()),
        ];

        let value = self.get(&url, &params).await?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// List an author's papers, returning the untouched payload.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_author_papers(
        &self,
        author_id: &str,
        limit: u32,
        fields: &[String],
    ) -> ClientResult<serde_json::Value> {
        let mut url = Url::parse(&self.graph_api_url)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["author", author_id, "papers"]);

        let params = vec![
            ("fields".to_string(), fields.join(",")),
            ("limit".to_string(), limit.to_string()),
        ];

        self.get(url.as_str(), &params).await
    }

    /// Get recommendations from positive and negative example papers.
    ///
    /// Never cached: the example sets change on every call.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_recommendations(
        &self,
        positive_ids: &[String],
        negative_ids: &[String],
        limit: u32,
        fields: &[String],
    ) -> ClientResult<serde_json::Value> {
        let url = format!("{}/papers", self.recommendations_api_url);

        let params = vec![
            ("fields".to_string(), fields.join(",")),
            ("limit".to_string(), limit.to_string()),
        ];

        let body = serde_json::json!({
            "positivePaperIds": positive_ids,
            "negativePaperIds": negative_ids,
        });

        tracing::debug!(
            positive = positive_ids.len(),
            negative = negative_ids.len(),
            has_api_key = self.has_api_key(),
            "Requesting recommendations"
        );

        self.post(&url, &params, &body).await
    }

    /// Make a GET request.
    async fn get(&self, url: &str, params: &[(String, String)]) -> ClientResult<serde_json::Value> {
        // Check cache
        let cache_key = self.cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::trace!(url, "Cache hit");
            return Ok(cached);
        }

        tracing::debug!(url, "GET");
        let response = self.client.get(url).query(params).send().await?;

        let value = self.handle_response(response).await?;

        // Cache response
        self.cache.insert(cache_key, value.clone()).await;

        Ok(value)
    }

    /// Make a POST request.
    async fn post(
        &self,
        url: &str,
        params: &[(String, String)],
        body: &serde_json::Value,
    ) -> ClientResult<serde_json::Value> {
        let body_str = serde_json::to_string(body)?;

        tracing::debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .query(params)
            .header("Content-Type", "application/json")
            .body(body_str)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check the status and decode the body as JSON.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<serde_json::Value> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Semantic Scholar API response");

        if status.is_success() {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(ClientError::from);
        }

        let retry_after = (status.as_u16() == 429).then(|| {
            response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60)
        });

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| serde_json::to_string(&v).ok())
            .unwrap_or_else(|| UNPARSABLE_ERROR_BODY.to_string());

        tracing::warn!(status = status.as_u16(), detail = %detail, "Semantic Scholar API error");
        match retry_after {
            Some(seconds) => Err(ClientError::rate_limited(seconds, detail)),
            None => Err(ClientError::upstream(status.as_u16(), detail)),
        }
    }

    /// Generate cache key.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient").field("has_api_key", &self.has_api_key()).finish()
    }
}
