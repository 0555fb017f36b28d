//! Canned drafts returned when every provider has failed.

use rand::Rng;

use crate::types::GenerationResult;

const MARKER: &str = "[PLACEHOLDER]";

/// The three fixed placeholder drafts with `topic` filled in.
#[must_use]
pub fn placeholder_drafts(topic: &str) -> [GenerationResult; 3] {
    [
        GenerationResult {
            post_text: format!(
                "{MARKER} \"{topic}\" is reshaping how we work! 🤖✨ Imagine workflows that save hours every week. #AI #FutureOfWork"
            ),
            rationale: "Placeholder draft (no model was available): opens with a bold claim, \
                        promises a concrete benefit, and closes with two broad hashtags."
                .to_owned(),
        },
        GenerationResult {
            post_text: format!(
                "{MARKER} Just explored \"{topic}\" and it's mind-blowing. 🚀 The tech landscape is shifting rapidly. Are you ready? #Tech #Innovation"
            ),
            rationale: "Placeholder draft (no model was available): a first-person hook builds \
                        curiosity and the closing question invites replies."
                .to_owned(),
        },
        GenerationResult {
            post_text: format!(
                "{MARKER} Why is everyone talking about \"{topic}\"? Because it's a game changer. 💡 Don't get left behind! #Trends #Growth"
            ),
            rationale: "Placeholder draft (no model was available): a question hook plus mild \
                        urgency is a reliable engagement pattern."
                .to_owned(),
        },
    ]
}

/// One placeholder draft chosen at random.
#[must_use]
pub fn pick_placeholder(topic: &str) -> GenerationResult {
    let mut drafts = Vec::from(placeholder_drafts(topic));
    let index = rand::rng().random_range(0..drafts.len());
    drafts.swap_remove(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_placeholder_mentions_topic_and_has_rationale() {
        for draft in placeholder_drafts("future of AI agents") {
            assert!(draft.post_text.starts_with(MARKER));
            assert!(draft.post_text.contains("\"future of AI agents\""));
            assert!(!draft.rationale.is_empty());
        }
    }

    #[test]
    fn picked_placeholder_is_one_of_the_fixed_set() {
        let pool = placeholder_drafts("rust");
        for _ in 0..20 {
            assert!(pool.contains(&pick_placeholder("rust")));
        }
    }
}
