//! Text-generation backends.

mod gemini;
mod openrouter;

use futures::future::BoxFuture;

use crate::error::ProviderError;
use crate::prompt::ChatPrompt;

pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;

/// A backend that turns a prompt into raw completion text for a named model.
///
/// Implementations do not interpret the text; structured-output recovery
/// happens in [`crate::parse`].
pub trait CompletionProvider: Send + Sync {
    /// Short identifier used in logs and attempt records.
    fn name(&self) -> &'static str;

    fn complete<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a ChatPrompt,
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}

/// Keeps error bodies short enough to log.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 300;
    if body.chars().count() <= MAX_CHARS {
        body.to_owned()
    } else {
        let mut truncated: String = body.chars().take(MAX_CHARS).collect();
        truncated.push('…');
        truncated
    }
}
