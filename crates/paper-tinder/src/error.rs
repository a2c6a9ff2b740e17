//! Error types for the gateway and the swipe session.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Message used when an upstream error body cannot be decoded as JSON.
pub const UNPARSABLE_ERROR_BODY: &str = "Could not parse error response";

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by Semantic Scholar API (429 response)
    #[error("Semantic Scholar API error: 429 - {detail} (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
        /// Error body re-serialized, or a placeholder when unparsable
        detail: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success status from the upstream API
    #[error("Semantic Scholar API error: {status} - {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error body re-serialized, or a placeholder when unparsable
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64, detail: impl Into<String>) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds), detail: detail.into() }
    }

    /// Create an upstream status error.
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    /// HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Middleware(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }
}

/// Errors from the metadata gateway operations.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// Missing or empty required input; raised before any network call.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// Parameter that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The external service failed or returned something unusable.
    #[error("{message}")]
    Upstream {
        /// Upstream status code, when the failure had one
        status: Option<u16>,
        /// Human-readable failure description
        message: String,
    },
}

impl GatewayError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument { field: field.into(), message: message.into() }
    }

    /// Returns true for errors caused by the caller's input.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Convert to the message placed in the `{error}` envelope.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::InvalidArgument { message, .. } => message.clone(),
            Self::Upstream { message, .. } => message.clone(),
        }
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        Self::Upstream { status: err.status(), message: err.to_string() }
    }
}

/// Errors from the recommendation session.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// A refresh was requested with no author papers and no liked papers.
    #[error("No papers available to base recommendations on")]
    EmptyBasis,

    /// The operation needs a selected author.
    #[error("No author selected")]
    NoAuthor,

    /// The queue is empty, so there is no current paper to decide on.
    #[error("No paper to decide on; refresh recommendations first")]
    EmptyQueue,

    /// Another gateway call is still in flight.
    #[error("Another request is already in progress")]
    Busy,

    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SessionError {
    /// Convert to a short notice for the user.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Gateway(GatewayError::Upstream { message, .. }) => {
                format!("Request to Semantic Scholar failed: {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
