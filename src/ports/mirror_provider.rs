//! Mirror provider port: the pluggable response strategy.
//!
//! # Design
//!
//! `generate` is infallible by contract. Each implementation owns its own
//! fallback: the rule-based strategy answers unknown blooms with a neutral
//! response, and the remote strategy converts every transport or service
//! failure into a fixed gentle reflection. No strategy failure may ever
//! reach the session engine.

use async_trait::async_trait;

use crate::domain::archetype::Archetype;
use crate::domain::bloom::BloomId;
use crate::domain::foundation::SessionId;
use crate::domain::signals::{TagSet, ToneTag};

/// Input to one reflection generation.
#[derive(Debug, Clone)]
pub struct MirrorRequest {
    pub session_id: SessionId,
    pub bloom_id: BloomId,
    pub journal_text: String,
    /// Tags accumulated across earlier blooms in this session. Consulted
    /// by archetype selection at the terminal bloom; never echoed back.
    pub prior_tags: TagSet,
}

/// Output of one reflection generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorResponse {
    pub text: String,
    /// Tags detected for this response, in detection order.
    pub tags: Vec<ToneTag>,
    /// Present only for terminal-bloom responses.
    pub archetype: Option<Archetype>,
}

/// Capability for producing a reflection from journal text.
#[async_trait]
pub trait MirrorProvider: Send + Sync {
    /// Generates a reflection. Never fails; see the module docs for the
    /// per-implementation fallback contract.
    async fn generate(&self, request: MirrorRequest) -> MirrorResponse;
}
