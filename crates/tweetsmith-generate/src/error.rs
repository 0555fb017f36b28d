use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("topic must not be empty")]
    EmptyTopic,
}

/// Why a single candidate failed. Always recoverable: the generator moves on.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS, or client-side timeout from `reqwest`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} API key is not configured")]
    MissingCredential(&'static str),

    #[error("provider returned an empty completion")]
    EmptyContent,

    #[error("completion did not contain a JSON object")]
    NoJsonObject,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}
