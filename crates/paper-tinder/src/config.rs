//! Configuration for the Paper Tinder gateway and session.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Recommendations API endpoint.
    pub const RECOMMENDATIONS_API: &str = "https://api.semanticscholar.org/recommendations/v1";

    /// Public author profile prefix, used when the API omits `url`.
    pub const AUTHOR_PROFILE_BASE: &str = "https://www.semanticscholar.org/author";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Result reuse window for author search and paper listing.
    pub const CACHE_TTL: Duration = Duration::from_secs(60);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Path prefix the HTTP routes are mounted under.
    pub const DEFAULT_BASE_PATH: &str = "/papertinder";
}

/// Limits applied by the gateway.
pub mod limits {
    /// Default number of authors per search.
    pub const SEARCH_DEFAULT: u32 = 10;

    /// Default number of papers fetched per author.
    pub const PAPERS_DEFAULT: u32 = 100;

    /// Hard cap on recommendations per call; keeps the swipe queue short.
    pub const RECOMMENDATIONS_MAX: u32 = 5;
}

/// Field sets for API requests.
pub mod fields {
    /// Paper fields always requested for author papers and recommendations.
    pub const PAPER_DEFAULT: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "year",
        "referenceCount",
        "citationCount",
        "influentialCitationCount",
        "isOpenAccess",
        "openAccessPdf",
        "fieldsOfStudy",
        "publicationVenue",
        "authors",
        "url",
        "externalIds",
    ];

    /// Author fields for author search.
    pub const AUTHOR: &[&str] =
        &["name", "url", "paperCount", "citationCount", "hIndex", "affiliations"];

    /// Merge extra fields into the default paper set.
    ///
    /// Defaults come first; extras are appended in order with blanks and
    /// duplicates dropped.
    #[must_use]
    pub fn merge_paper_fields<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
        let mut merged: Vec<String> = PAPER_DEFAULT.iter().map(|f| (*f).to_string()).collect();
        for field in extra {
            let field = field.as_ref().trim();
            if !field.is_empty() && !merged.iter().any(|f| f == field) {
                merged.push(field.to_string());
            }
        }
        merged
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Base URL for Recommendations API (for testing with mock servers).
    pub recommendations_api_url: String,

    /// Path prefix for the HTTP routes; empty mounts them at the root.
    pub base_path: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Maximum retries for transient upstream failures.
    pub max_retries: u32,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,
}

impl Config {
    /// Create a new configuration with optional API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            graph_api_url: api::GRAPH_API.to_string(),
            recommendations_api_url: api::RECOMMENDATIONS_API.to_string(),
            base_path: api::DEFAULT_BASE_PATH.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: 3,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            recommendations_api_url: format!("{}/recommendations/v1", base_url),
            base_path: String::new(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0,
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Loads a `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok());
        if let Ok(base_path) = std::env::var("PAPER_TINDER_BASE_PATH") {
            config.base_path = normalize_base_path(&base_path)?;
        }
        Ok(config)
    }

    /// Replace the route prefix.
    ///
    /// # Errors
    ///
    /// Returns error if the prefix is not a plain absolute path.
    pub fn with_base_path(mut self, base_path: &str) -> anyhow::Result<Self> {
        self.base_path = normalize_base_path(base_path)?;
        Ok(self)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Normalize a route prefix to `""` or `/segment[/segment...]` without a
/// trailing slash.
fn normalize_base_path(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        anyhow::bail!("base path must start with '/': {raw}");
    }
    if trimmed.contains(['?', '#', ' ']) || trimmed.contains("//") {
        anyhow::bail!("base path must be a plain path: {raw}");
    }
    Ok(trimmed.to_string())
}
