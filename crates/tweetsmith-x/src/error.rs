use thiserror::Error;

/// Errors raised while building an OAuth 1.0a `Authorization` header.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// One of the four pre-provisioned values is empty. Not retryable.
    #[error("missing OAuth credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    #[error("authorization header is not a valid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Errors returned by the X API client.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request signing failed: {0}")]
    Signing(#[from] OAuthError),

    /// HTTP 402 or 429: the access tier's posting allowance is used up.
    #[error(
        "X API quota exceeded (HTTP {status}): the posting allowance for this account is used up, \
         try again later or upgrade the API access tier. Response: {body}"
    )]
    QuotaExceeded { status: u16, body: String },

    /// Any other non-2xx response, carrying the raw body.
    #[error("X API request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PublishError {
    /// Remote HTTP status for API-level failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::QuotaExceeded { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Signing(_) | Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => None,
        }
    }

    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
