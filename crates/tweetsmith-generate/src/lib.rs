//! Post drafting for tweetsmith.
//!
//! [`Generator`] walks an ordered list of model candidates (OpenRouter
//! free-tier models, then Gemini direct), recovers a `{tweet, explanation}`
//! object from whatever text comes back, and falls back to a canned
//! placeholder when every candidate fails. It never returns an error.

pub mod error;
pub mod generator;
pub mod parse;
pub mod placeholder;
pub mod prompt;
pub mod providers;
pub mod types;

pub use error::{GenerateError, ProviderError};
pub use generator::{Candidate, GenerationReport, Generator};
pub use parse::{extract_draft, recover_json_object, strip_code_fence};
pub use placeholder::{pick_placeholder, placeholder_drafts};
pub use prompt::{build_prompt, ChatPrompt, MAX_POST_CHARS};
pub use providers::{CompletionProvider, GeminiClient, OpenRouterClient};
pub use types::{AttemptOutcome, GenerationRequest, GenerationResult, ProviderAttempt};
