use std::net::SocketAddr;

/// Candidate models tried against OpenRouter, in order.
pub const DEFAULT_OPENROUTER_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-exp:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "mistralai/mistral-7b-instruct:free",
    "openchat/openchat-7:free",
    "qwen/qwen-2.5-72b-instruct:free",
    "microsoft/phi-3-medium-128k-instruct:free",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which X endpoint receives new posts.
///
/// `V2` sends a JSON body that is excluded from the OAuth signature;
/// `Legacy` sends a form body whose pairs are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostApi {
    #[default]
    V2,
    Legacy,
}

/// The four pre-provisioned values for one-legged OAuth 1.0a signing.
#[derive(Clone)]
pub struct XCredentialsConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl std::fmt::Debug for XCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XCredentialsConfig")
            .field("consumer_key", &"[redacted]")
            .field("consumer_secret", &"[redacted]")
            .field("access_token", &"[redacted]")
            .field("access_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub site_url: String,
    pub app_title: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_models: Vec<String>,
    /// Send `response_format: json_object` to OpenRouter.
    pub openrouter_json_mode: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub provider_timeout_secs: u64,
    /// `None` when any of the four X values is absent.
    pub x_credentials: Option<XCredentialsConfig>,
    pub x_timeout_secs: u64,
    pub x_post_api: PostApi,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("site_url", &self.site_url)
            .field("app_title", &self.app_title)
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openrouter_models", &self.openrouter_models)
            .field("openrouter_json_mode", &self.openrouter_json_mode)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("x_credentials", &self.x_credentials)
            .field("x_timeout_secs", &self.x_timeout_secs)
            .field("x_post_api", &self.x_post_api)
            .finish()
    }
}
