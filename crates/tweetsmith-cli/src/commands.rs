//! Command handlers. Each one builds the services it needs from
//! [`AppConfig`] and prints its result to stdout.

use anyhow::Context;
use serde_json::json;
use tweetsmith_core::AppConfig;
use tweetsmith_generate::{GenerationRequest, Generator, MAX_POST_CHARS};
use tweetsmith_x::{Credentials, XClient};

pub(crate) async fn run_generate(
    config: &AppConfig,
    topic: &str,
    preferences: Option<&str>,
    trace: bool,
) -> anyhow::Result<()> {
    let request = GenerationRequest::new(topic, preferences)?;
    let generator = Generator::from_config(config)?;
    let report = generator.generate_traced(&request).await;

    if trace {
        for attempt in &report.attempts {
            eprintln!(
                "{:<60} {:?}{}",
                attempt.provider_id,
                attempt.outcome,
                attempt
                    .error_detail
                    .as_deref()
                    .map(|d| format!(": {d}"))
                    .unwrap_or_default()
            );
        }
        if report.source.is_none() {
            eprintln!("all candidates failed; placeholder draft returned");
        }
    }

    let output = json!({
        "tweet": report.result.post_text,
        "explanation": report.result.rationale,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_post(
    config: &AppConfig,
    text: &str,
    skip_verify: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("post text must not be empty");
    }
    let chars = text.chars().count();
    if chars > MAX_POST_CHARS {
        tracing::warn!(
            chars,
            limit = MAX_POST_CHARS,
            "post exceeds the character limit; X may reject it"
        );
    }

    let client = x_client(config)?;
    let post = if skip_verify {
        client.create_post(text).await?
    } else {
        client.publish(text).await?
    };

    let output = json!({ "success": true, "id": post.id, "text": post.text });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_whoami(config: &AppConfig) -> anyhow::Result<()> {
    let user = x_client(config)?.verify_credentials().await?;
    println!("{} (@{}) id={}", user.name, user.username, user.id);
    Ok(())
}

fn x_client(config: &AppConfig) -> anyhow::Result<XClient> {
    let x = config.x_credentials.as_ref().context(
        "X credentials are not configured; set TWITTER_API_KEY, TWITTER_API_SECRET, \
         TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_SECRET",
    )?;
    let credentials = Credentials::try_from(x)?;
    Ok(XClient::new(credentials, config.x_timeout_secs, config.x_post_api)?)
}
