//! Tone-signal extraction from free-form journal text.
//!
//! Extraction is deliberately shallow: case-insensitive substring matching
//! against a fixed rule table. No accuracy is claimed beyond deterministic
//! keyword-triggered behavior.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A short label denoting a detected emotional or thematic cue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneTag(String);

impl ToneTag {
    /// Creates a tone tag from a raw label.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the raw label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ToneTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Accumulated tone tags for a session. Insertion order is irrelevant;
/// merging reflections into a session is a set union.
pub type TagSet = BTreeSet<ToneTag>;

/// The fixed signal vocabulary: tag label and the trigger phrases that
/// fire it. Declaration order matters to the rule-based strategy, which
/// tests detected tags against per-bloom overrides in this order and
/// stops at the first match.
pub const SIGNAL_RULES: &[(&str, &[&str])] = &[
    ("should", &["should", "supposed to"]),
    ("cant", &["can't", "unable"]),
    ("must", &["must", "have to"]),
    ("excitement", &["excited", "energy"]),
    ("uncertainty", &["unsure", "don't know"]),
    ("restless", &["restless", "anxious"]),
    ("heavy", &["heavy", "burden"]),
    ("confused", &["confused", "mixed up"]),
    ("peaceful", &["peace", "calm"]),
    ("stuck", &["stuck", "trapped"]),
    ("overwhelmed", &["overwhelmed", "too much"]),
    ("frustrated", &["frustrated", "annoyed"]),
    ("trust", &["trust", "faith"]),
    ("patience", &["patient", "wait"]),
    ("love", &["love", "heart"]),
    ("small", &["small", "little"]),
    ("rest", &["rest", "tired"]),
    ("create", &["create", "make"]),
    ("clarity", &["clear", "understand"]),
    ("strength", &["strong", "power"]),
];

/// Extracts tone signals from journal text.
///
/// Pure and total: empty or non-matching text yields an empty set, and
/// multiple rules may fire for one input.
pub struct SignalExtractor;

impl SignalExtractor {
    /// Scans `text` against [`SIGNAL_RULES`] and returns every tag whose
    /// trigger phrases appear as a case-insensitive substring.
    pub fn extract(text: &str) -> TagSet {
        let mut tags = TagSet::new();
        if text.trim().is_empty() {
            return tags;
        }

        let lower = text.to_lowercase();
        for (tag, phrases) in SIGNAL_RULES {
            if phrases.iter().any(|p| lower.contains(p)) {
                tags.insert(ToneTag::new(*tag));
            }
        }
        tags
    }
}
