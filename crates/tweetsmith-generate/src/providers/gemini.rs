//! Google Gemini `generateContent` client, used as the secondary provider.
//!
//! Gemini has no separate system channel here, so the instructions are
//! inlined ahead of the topic in a single text part.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{truncate_body, CompletionProvider};
use crate::error::ProviderError;
use crate::prompt::ChatPrompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: Option<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: Option<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &ChatPrompt,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("Gemini"))?;

        let text = prompt.inline();
        let request = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: &text }],
            }],
        };
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(redact_url)?;
        let status = response.status();
        let body = response.text().await.map_err(redact_url)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: "gemini",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("gemini generateContent (model={model})"),
                source: e,
            })?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }
}

/// The request URL carries the API key, and reqwest errors embed the URL.
fn redact_url(error: reqwest::Error) -> ProviderError {
    ProviderError::Http(error.without_url())
}

impl CompletionProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a ChatPrompt,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.generate_content(model, prompt).boxed()
    }
}
