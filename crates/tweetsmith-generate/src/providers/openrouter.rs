//! OpenRouter chat-completions client (OpenAI-compatible API).

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{truncate_body, CompletionProvider};
use crate::error::ProviderError;
use crate::prompt::ChatPrompt;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const TEMPERATURE: f32 = 0.8;

/// Primary provider. One client serves every candidate model.
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    completions_url: String,
    site_url: Option<String>,
    app_title: Option<String>,
    json_mode: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenRouterClient {
    /// Creates a client pointed at the production OpenRouter API.
    ///
    /// A missing key is not an error here: every call then fails with
    /// [`ProviderError::MissingCredential`] and the generator moves on.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: Option<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
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
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            site_url: None,
            app_title: None,
            json_mode: false,
        })
    }

    /// Sets the `HTTP-Referer` and `X-Title` attribution headers.
    #[must_use]
    pub fn with_attribution(mut self, site_url: &str, app_title: &str) -> Self {
        self.site_url = Some(site_url.to_owned());
        self.app_title = Some(app_title.to_owned());
        self
    }

    /// Requests `response_format: json_object`. Off by default; several free
    /// models answer 400 when it is present.
    #[must_use]
    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("OpenRouter"))?;

        let request = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut builder = self
            .client
            .post(&self.completions_url)
            .bearer_auth(api_key)
            .json(&request);
        if let Some(site_url) = &self.site_url {
            builder = builder.header(reqwest::header::REFERER, site_url);
        }
        if let Some(app_title) = &self.app_title {
            builder = builder.header("X-Title", app_title);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: "openrouter",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("openrouter chat completion (model={model})"),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }
}

impl CompletionProvider for OpenRouterClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn complete<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a ChatPrompt,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.chat(model, prompt).boxed()
    }
}
