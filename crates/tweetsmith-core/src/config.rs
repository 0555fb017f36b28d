use crate::app_config::{
    AppConfig, Environment, PostApi, XCredentialsConfig, DEFAULT_OPENROUTER_MODELS,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Blank values count as unset; secrets pasted into .env often carry stray whitespace.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let env = parse_environment(&or_default("TWEETSMITH_ENV", "development"));
    let bind_addr = parse_addr("TWEETSMITH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TWEETSMITH_LOG_LEVEL", "info");
    let site_url = or_default("TWEETSMITH_SITE_URL", "http://localhost:3000");
    let app_title = or_default("TWEETSMITH_APP_TITLE", "Tweetsmith");

    let openrouter_api_key = optional("OPENROUTER_API_KEY");
    let openrouter_models = optional("TWEETSMITH_OPENROUTER_MODELS").map_or_else(
        || {
            DEFAULT_OPENROUTER_MODELS
                .iter()
                .map(|m| (*m).to_string())
                .collect()
        },
        |raw| parse_model_list(&raw),
    );
    if openrouter_models.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "TWEETSMITH_OPENROUTER_MODELS".to_string(),
            reason: "must name at least one model".to_string(),
        });
    }

    let openrouter_json_mode = parse_bool("TWEETSMITH_OPENROUTER_JSON_MODE", "false")?;

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("TWEETSMITH_GEMINI_MODEL", "gemini-1.5-flash");
    let provider_timeout_secs = parse_u64("TWEETSMITH_PROVIDER_TIMEOUT_SECS", "30")?;

    let x_credentials = match (
        optional("TWITTER_API_KEY"),
        optional("TWITTER_API_SECRET"),
        optional("TWITTER_ACCESS_TOKEN"),
        optional("TWITTER_ACCESS_SECRET"),
    ) {
        (Some(consumer_key), Some(consumer_secret), Some(access_token), Some(access_secret)) => {
            Some(XCredentialsConfig {
                consumer_key,
                consumer_secret,
                access_token,
                access_secret,
            })
        }
        _ => None,
    };
    let x_timeout_secs = parse_u64("TWEETSMITH_X_TIMEOUT_SECS", "15")?;
    let x_post_api = parse_post_api(&or_default("TWEETSMITH_X_POST_API", "v2"))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        site_url,
        app_title,
        openrouter_api_key,
        openrouter_models,
        openrouter_json_mode,
        gemini_api_key,
        gemini_model,
        provider_timeout_secs,
        x_credentials,
        x_timeout_secs,
        x_post_api,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_post_api(s: &str) -> Result<PostApi, ConfigError> {
    match s {
        "v2" => Ok(PostApi::V2),
        "v1.1" | "legacy" => Ok(PostApi::Legacy),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TWEETSMITH_X_POST_API".to_string(),
            reason: format!("expected 'v2' or 'v1.1', got '{other}'"),
        }),
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
