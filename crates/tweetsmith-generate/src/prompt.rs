//! Prompt text sent to every provider.

use crate::types::GenerationRequest;

/// Character ceiling for an X post.
pub const MAX_POST_CHARS: usize = 280;

const SYSTEM_INSTRUCTIONS: &str = "\
You are an expert social media manager specializing in X (Twitter).
Your task is to craft high-impact, engaging posts based on the user's input.

Guidelines:
- Length: strictly under 280 characters.
- Style: dynamic, professional yet accessible, potentially viral.
- Structure: Hook -> Value/Point -> Call to Action (if appropriate).
- Hashtags: include 1-3 relevant, high-traffic hashtags.
- Response: return ONLY a JSON object with exactly two keys:
  \"tweet\": the post text, with no surrounding quotes;
  \"explanation\": one or two sentences on why this post should perform well.
  No Markdown, no extra keys, no commentary outside the JSON object.";

/// A system instruction plus a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    /// Single-message form for providers without a system role.
    #[must_use]
    pub fn inline(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> ChatPrompt {
    let mut user = format!("Topic: {}", request.topic());
    if let Some(preferences) = request.preferences() {
        user.push_str("\nPreferences: ");
        user.push_str(preferences);
    }
    ChatPrompt {
        system: SYSTEM_INSTRUCTIONS.to_owned(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instructions_state_the_contract() {
        let prompt = build_prompt(&GenerationRequest::new("rust", None).expect("valid"));
        assert!(prompt.system.contains("under 280 characters"));
        assert!(prompt.system.contains("Hook -> Value/Point -> Call to Action"));
        assert!(prompt.system.contains("1-3"));
        assert!(prompt.system.contains("\"tweet\""));
        assert!(prompt.system.contains("\"explanation\""));
    }

    #[test]
    fn user_message_includes_preferences_when_present() {
        let with = build_prompt(&GenerationRequest::new("rust", Some("witty")).expect("valid"));
        assert_eq!(with.user, "Topic: rust\nPreferences: witty");

        let without = build_prompt(&GenerationRequest::new("rust", None).expect("valid"));
        assert_eq!(without.user, "Topic: rust");
    }

    #[test]
    fn inline_embeds_instructions_before_topic() {
        let prompt = build_prompt(&GenerationRequest::new("rust", None).expect("valid"));
        let inline = prompt.inline();
        assert!(inline.starts_with("You are an expert social media manager"));
        assert!(inline.ends_with("Topic: rust"));
    }
}
