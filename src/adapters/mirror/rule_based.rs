//! Rule-based mirror strategy.
//!
//! Holds a fixed per-bloom table of base responses and tag-keyed override
//! texts. Signal detection runs over the journal text; the first detected
//! tag (in rule-table declaration order) that has an override for the
//! current bloom replaces the base text entirely. At the terminal bloom
//! the archetype text replaces whatever was chosen before it.
//!
//! Total by construction: an unknown bloom id yields a neutral fallback
//! response, never an error.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::archetype::{Archetype, ArchetypeSelector};
use crate::domain::signals::{SignalExtractor, TagSet, ToneTag, SIGNAL_RULES};
use crate::ports::{MirrorProvider, MirrorRequest, MirrorResponse};

/// Neutral response for blooms outside the rule table.
const UNKNOWN_BLOOM_TEXT: &str = "I'm listening...";

struct BloomRules {
    base: &'static str,
    overrides: &'static [(&'static str, &'static str)],
}

static RESPONSE_TABLE: Lazy<HashMap<&'static str, BloomRules>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "B1",
        BloomRules {
            base: "I can sense that gentle stirring in you. Sometimes it whispers, \
                   sometimes it calls out more boldly.",
            overrides: &[
                (
                    "excitement",
                    "There's a lightness dancing in your words. Something wants to unfold, \
                     doesn't it?",
                ),
                (
                    "uncertainty",
                    "That's the beauty of this threshold moment \u{2014} not knowing can be \
                     the beginning of knowing.",
                ),
                (
                    "restless",
                    "Restlessness often carries seeds of something new wanting to grow.",
                ),
            ],
        },
    );
    table.insert(
        "B2",
        BloomRules {
            base: "Feelings are such honest messengers. They don't lie about what's moving \
                   in your inner landscape.",
            overrides: &[
                (
                    "heavy",
                    "Heavy feelings need space to breathe. You're brave for naming them here.",
                ),
                (
                    "confused",
                    "Sometimes feelings swirl together like weather systems. That's okay \
                     \u{2014} let them move.",
                ),
                (
                    "peaceful",
                    "There's something beautiful about finding peace in the middle of \
                     everything.",
                ),
            ],
        },
    );
    table.insert(
        "B3",
        BloomRules {
            base: "Beliefs can be such invisible architects, building the world we think \
                   we live in.",
            overrides: &[
                (
                    "should",
                    "Ah, the voice of 'should.' What if we loosened its grip just a little?",
                ),
                (
                    "cant",
                    "Sometimes 'I can't' is really 'I'm afraid.' And fear can be a wise \
                     teacher.",
                ),
                (
                    "must",
                    "What if this 'must' could soften into a gentle invitation instead?",
                ),
            ],
        },
    );
    table.insert(
        "B4",
        BloomRules {
            base: "Every challenge carries medicine \u{2014} even when it feels sharp, even \
                   when we can't see it yet.",
            overrides: &[
                (
                    "stuck",
                    "Stuck energy often means something is ready to shift. You're at a \
                     threshold.",
                ),
                (
                    "overwhelmed",
                    "When everything feels too much, sometimes the invitation is to find \
                     just one breath.",
                ),
                (
                    "frustrated",
                    "Frustration can be creative energy looking for a new direction.",
                ),
            ],
        },
    );
    table.insert(
        "B5",
        BloomRules {
            base: "Your inner wisdom is always speaking. Sometimes we just need to get \
                   quiet enough to hear.",
            overrides: &[
                (
                    "trust",
                    "Yes, trust. It's like coming home to something that was never really \
                     gone.",
                ),
                (
                    "patience",
                    "The wisdom of patience \u{2014} letting things ripen in their own time.",
                ),
                (
                    "love",
                    "Love as guidance... there's something so simple and revolutionary \
                     about that.",
                ),
            ],
        },
    );
    table.insert(
        "B6",
        BloomRules {
            base: "Every moment holds an invitation. Not a demand, not a should \u{2014} \
                   just a gentle opening.",
            overrides: &[
                (
                    "small",
                    "Sometimes the smallest steps carry the deepest transformation.",
                ),
                (
                    "rest",
                    "Rest as action. There's profound wisdom in knowing when to be still.",
                ),
                (
                    "create",
                    "Something wants to come through you. What a beautiful invitation.",
                ),
            ],
        },
    );
    table.insert(
        "B7",
        BloomRules {
            base: "Integration is like planting seeds in your heart. Something has already \
                   begun to shift.",
            overrides: &[
                (
                    "clarity",
                    "This clarity feels earned. You've walked through something and emerged \
                     with new sight.",
                ),
                (
                    "peaceful",
                    "There's a settled quality to this peace \u{2014} like you've made \
                     friends with something inside.",
                ),
                (
                    "strength",
                    "This strength has weight to it. It feels rooted in something real.",
                ),
            ],
        },
    );
    table.insert(
        "B8",
        BloomRules {
            base: "There's a presence walking with you. Can you feel it? Patient, knowing, \
                   completely at home with who you are.",
            overrides: &[],
        },
    );
    table
});

fn archetype_text(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Listener => {
            "The Listener \u{2014} one who holds space without needing to fill it. That's \
             the frequency you're carrying today."
        }
        Archetype::Seeker => {
            "The Seeker \u{2014} always moving toward what calls, trusting the journey more \
             than the destination."
        }
        Archetype::Guardian => {
            "The Guardian \u{2014} protecting what matters, holding space for growth and \
             healing."
        }
        Archetype::Creator => {
            "The Creator \u{2014} bringing something new into being, trusting the process \
             of emergence."
        }
        Archetype::Sage => {
            "The Sage \u{2014} holding wisdom lightly, sharing insight without attachment \
             to being right."
        }
    }
}

/// Local, deterministic mirror strategy.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedMirror;

impl RuleBasedMirror {
    pub fn new() -> Self {
        Self
    }

    /// Orders detected tags by rule-table declaration order, which is the
    /// order the first-match scan observed them.
    fn in_rule_order(detected: &TagSet) -> Vec<ToneTag> {
        SIGNAL_RULES
            .iter()
            .map(|(tag, _)| ToneTag::new(*tag))
            .filter(|tag| detected.contains(tag))
            .collect()
    }
}

#[async_trait]
impl MirrorProvider for RuleBasedMirror {
    async fn generate(&self, request: MirrorRequest) -> MirrorResponse {
        let detected = SignalExtractor::extract(&request.journal_text);

        let Some(rules) = RESPONSE_TABLE.get(request.bloom_id.as_str()) else {
            return MirrorResponse {
                text: UNKNOWN_BLOOM_TEXT.to_string(),
                tags: Vec::new(),
                archetype: None,
            };
        };

        let mut text = rules.base;
        for tag in Self::in_rule_order(&detected) {
            if let Some((_, override_text)) =
                rules.overrides.iter().find(|(t, _)| *t == tag.as_str())
            {
                text = override_text;
                break;
            }
        }

        // Terminal bloom: resolve the archetype over everything gathered
        // this session and let its text take precedence.
        let mut archetype = None;
        if request.bloom_id.as_str() == "B8" {
            let mut combined = detected.clone();
            combined.extend(request.prior_tags.iter().cloned());
            let selected = ArchetypeSelector::select(&combined);
            text = archetype_text(selected);
            archetype = Some(selected);
        }

        MirrorResponse {
            text: text.to_string(),
            tags: Self::in_rule_order(&detected),
            archetype,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bloom::BloomId;
    use crate::domain::foundation::SessionId;

    fn request(bloom: &str, text: &str, prior: &[&str]) -> MirrorRequest {
        MirrorRequest {
            session_id: SessionId::new(),
            bloom_id: BloomId::new(bloom),
            journal_text: text.to_string(),
            prior_tags: prior.iter().map(|t| ToneTag::new(*t)).collect(),
        }
    }

    #[tokio::test]
    async fn unknown_bloom_returns_neutral_fallback() {
        let mirror = RuleBasedMirror::new();
        let response = mirror.generate(request("B99", "anything at all", &[])).await;

        assert_eq!(response.text, "I'm listening...");
        assert!(response.tags.is_empty());
        assert!(response.archetype.is_none());
    }

    #[tokio::test]
    async fn base_text_when_no_signal_detected() {
        let mirror = RuleBasedMirror::new();
        let response = mirror.generate(request("B1", "nothing in particular", &[])).await;

        assert!(response.text.starts_with("I can sense that gentle stirring"));
        assert!(response.tags.is_empty());
    }

    #[tokio::test]
    async fn should_override_replaces_b3_base_text() {
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B3", "I feel like I should be further along", &[]))
            .await;

        assert!(response.text.starts_with("Ah, the voice of 'should.'"));
        assert!(response.tags.contains(&ToneTag::new("should")));
    }

    #[tokio::test]
    async fn first_matching_override_wins() {
        // Both "should" and "must" fire; "should" is earlier in the table.
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B3", "I should stop, I must stop", &[]))
            .await;

        assert!(response.text.starts_with("Ah, the voice of 'should.'"));
    }

    #[tokio::test]
    async fn detected_tag_without_override_keeps_base() {
        // "love" fires but B1 has no override for it.
        let mirror = RuleBasedMirror::new();
        let response = mirror.generate(request("B1", "my heart feels open", &[])).await;

        assert!(response.text.starts_with("I can sense that gentle stirring"));
        assert_eq!(response.tags, vec![ToneTag::new("love")]);
    }

    #[tokio::test]
    async fn tags_are_returned_in_rule_table_order() {
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B1", "I trust this heavy feeling", &[]))
            .await;

        // heavy precedes trust in the rule table.
        assert_eq!(
            response.tags,
            vec![ToneTag::new("heavy"), ToneTag::new("trust")]
        );
    }

    #[tokio::test]
    async fn terminal_bloom_selects_archetype_from_combined_tags() {
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B8", "just being here", &["love", "trust"]))
            .await;

        assert_eq!(response.archetype, Some(Archetype::Guardian));
        assert!(response.text.starts_with("The Guardian"));
    }

    #[tokio::test]
    async fn terminal_bloom_defaults_to_listener() {
        let mirror = RuleBasedMirror::new();
        let response = mirror.generate(request("B8", "quiet presence", &[])).await;

        assert_eq!(response.archetype, Some(Archetype::Listener));
        assert!(response.text.starts_with("The Listener"));
    }

    #[tokio::test]
    async fn archetype_text_outranks_signal_override() {
        // "excitement" is detected at B8, but B8 has no signal overrides and
        // the archetype text always takes the terminal slot.
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B8", "so much energy, excited to meet this", &[]))
            .await;

        assert_eq!(response.archetype, Some(Archetype::Seeker));
        assert!(response.text.starts_with("The Seeker"));
    }

    #[tokio::test]
    async fn prior_tags_are_not_echoed_back() {
        let mirror = RuleBasedMirror::new();
        let response = mirror
            .generate(request("B2", "plain words", &["love", "trust"]))
            .await;

        assert!(response.tags.is_empty());
    }
}
