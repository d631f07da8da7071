//! Journal entry and reflection records.
//!
//! Both are created once per prompt response and paired 1:1 by
//! `(session_id, bloom_id)`. A resubmission after back-navigation
//! overwrites the stored pair (last write wins); it never duplicates it.

use serde::{Deserialize, Serialize};

use crate::domain::bloom::BloomId;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::signals::ToneTag;

/// What the journaler wrote at one bloom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub session_id: SessionId,
    pub bloom_id: BloomId,
    pub content: String,
    pub created_at: Timestamp,
}

impl JournalEntry {
    /// Creates an entry for the given bloom, stamped now.
    pub fn new(session_id: SessionId, bloom_id: BloomId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            bloom_id,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// The mirror's synthesized response to a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub session_id: SessionId,
    pub bloom_id: BloomId,
    pub text: String,
    /// Tags detected for this response, in detection order.
    pub tone_tags: Vec<ToneTag>,
    pub created_at: Timestamp,
}

impl Reflection {
    /// Creates a reflection for the given bloom, stamped now.
    pub fn new(
        session_id: SessionId,
        bloom_id: BloomId,
        text: impl Into<String>,
        tone_tags: Vec<ToneTag>,
    ) -> Self {
        Self {
            session_id,
            bloom_id,
            text: text.into(),
            tone_tags,
            created_at: Timestamp::now(),
        }
    }
}
