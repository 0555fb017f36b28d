//! HTTP client for the X (Twitter) API.
//!
//! Every request is signed with [`Signer`] immediately before it is sent.
//! Posting is never retried: a duplicate post is worse than a surfaced error.

use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::PublishError;
use crate::oauth::{Credentials, SignatureBody, Signer};
use crate::types::{CreatePostBody, DataEnvelope, LegacyStatus, PublishResult, XUser};
use tweetsmith_core::PostApi;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/";

/// Client for the X API using one-legged OAuth 1.0a.
///
/// Use [`XClient::new`] for production or [`XClient::with_base_url`] to point
/// at a mock server in tests.
pub struct XClient {
    client: Client,
    signer: Signer,
    base_url: Url,
    post_api: PostApi,
}

impl XClient {
    /// Creates a client pointed at the production X API.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: Credentials,
        timeout_secs: u64,
        post_api: PostApi,
    ) -> Result<Self, PublishError> {
        Self::with_base_url(credentials, timeout_secs, post_api, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PublishError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: Credentials,
        timeout_secs: u64,
        post_api: PostApi,
        base_url: &str,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tweetsmith/0.1")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PublishError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            signer: Signer::new(credentials),
            base_url,
            post_api,
        })
    }

    #[must_use]
    pub fn post_api(&self) -> PostApi {
        self.post_api
    }

    /// Looks up the account behind the access token (`GET 2/users/me`).
    ///
    /// # Errors
    ///
    /// - [`PublishError::QuotaExceeded`] / [`PublishError::Api`] on non-2xx.
    /// - [`PublishError::Http`] on network failure or timeout.
    /// - [`PublishError::Deserialize`] if the body is not the expected shape.
    pub async fn verify_credentials(&self) -> Result<XUser, PublishError> {
        let url = self.endpoint("2/users/me")?;
        let headers = self.signer.sign(&Method::GET, &url, SignatureBody::Empty)?;
        let response = self.client.get(url).headers(headers).send().await?;
        let envelope: DataEnvelope<XUser> = read_json(response, "GET 2/users/me").await?;
        Ok(envelope.data)
    }

    /// Creates one post through the configured endpoint. Exactly one HTTP
    /// request is made.
    ///
    /// # Errors
    ///
    /// - [`PublishError::QuotaExceeded`] on HTTP 402 or 429.
    /// - [`PublishError::Api`] on any other non-2xx, with the raw body.
    /// - [`PublishError::Http`] on network failure or timeout.
    /// - [`PublishError::Deserialize`] if the success body is not the expected shape.
    pub async fn create_post(&self, text: &str) -> Result<PublishResult, PublishError> {
        match self.post_api {
            PostApi::V2 => self.create_post_v2(text).await,
            PostApi::Legacy => self.create_post_legacy(text).await,
        }
    }

    /// Advisory identity check followed by a single post attempt.
    ///
    /// A failed identity check is logged and ignored.
    ///
    /// # Errors
    ///
    /// Same as [`XClient::create_post`].
    pub async fn publish(&self, text: &str) -> Result<PublishResult, PublishError> {
        match self.verify_credentials().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "X credentials verified");
            }
            Err(e) => {
                tracing::warn!(error = %e, "X credential check failed; posting anyway");
            }
        }

        let result = self.create_post(text).await;
        match &result {
            Ok(post) => tracing::info!(post_id = %post.id, "post published"),
            Err(e) => tracing::error!(error = %e, status = ?e.status(), "post failed"),
        }
        result
    }

    /// `POST 2/tweets` with a JSON body; the body is not signed.
    async fn create_post_v2(&self, text: &str) -> Result<PublishResult, PublishError> {
        let url = self.endpoint("2/tweets")?;
        let headers = self.signer.sign(&Method::POST, &url, SignatureBody::Json)?;
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&CreatePostBody { text })
            .send()
            .await?;
        let envelope: DataEnvelope<PublishResult> = read_json(response, "POST 2/tweets").await?;
        Ok(envelope.data)
    }

    /// `POST 1.1/statuses/update.json` with a form body; the pairs are signed.
    async fn create_post_legacy(&self, text: &str) -> Result<PublishResult, PublishError> {
        let url = self.endpoint("1.1/statuses/update.json")?;
        let pairs = [("status", text)];
        let headers = self
            .signer
            .sign(&Method::POST, &url, SignatureBody::Form(&pairs))?;
        let response = self
            .client
            .post(url)
            .headers(headers)
            .form(&pairs)
            .send()
            .await?;
        let status: LegacyStatus = read_json(response, "POST 1.1/statuses/update.json").await?;
        Ok(PublishResult {
            id: status.id_str,
            text: status.text,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PublishError> {
        self.base_url
            .join(path)
            .map_err(|e| PublishError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }
}

/// Maps non-2xx to [`PublishError`] and parses the success body.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, PublishError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let code = status.as_u16();
        return Err(match code {
            402 | 429 => PublishError::QuotaExceeded { status: code, body },
            _ => PublishError::Api { status: code, body },
        });
    }

    serde_json::from_str(&body).map_err(|e| PublishError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
