//! Session aggregate entity.
//!
//! Owned exclusively by the session engine while a run is in flight;
//! persisted snapshots belong to the record store.
//!
//! # Invariants
//!
//! - `tone_tags` is the union of all reflection tags produced in this session
//! - `archetype` is set from a terminal-bloom response; last non-null write wins
//! - `blooms_visited` contains no duplicate ids
//! - `completed_at`, once set, is never cleared

use serde::{Deserialize, Serialize};

use crate::domain::archetype::Archetype;
use crate::domain::bloom::BloomId;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::signals::TagSet;

/// One guided reflection session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// When the session began.
    started_at: Timestamp,

    /// When the session completed; `None` while the spiral is in progress.
    completed_at: Option<Timestamp>,

    /// Union of tone tags across all reflections in this session.
    tone_tags: TagSet,

    /// Archetype resolved at the terminal bloom, if reached.
    archetype: Option<Archetype>,

    /// Blooms visited, in first-visit order, without duplicates.
    blooms_visited: Vec<BloomId>,
}

impl Session {
    /// Begins a new session.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            started_at: Timestamp::now(),
            completed_at: None,
            tone_tags: TagSet::new(),
            archetype: None,
            blooms_visited: Vec::new(),
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        started_at: Timestamp,
        completed_at: Option<Timestamp>,
        tone_tags: TagSet,
        archetype: Option<Archetype>,
        blooms_visited: Vec<BloomId>,
    ) -> Self {
        Self {
            id,
            started_at,
            completed_at,
            tone_tags,
            archetype,
            blooms_visited,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns when the session began.
    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Returns when the session completed, if it has.
    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// True once the session has completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns the accumulated tone tags.
    pub fn tone_tags(&self) -> &TagSet {
        &self.tone_tags
    }

    /// Returns the resolved archetype, if any.
    pub fn archetype(&self) -> Option<Archetype> {
        self.archetype
    }

    /// Returns the blooms visited so far, in first-visit order.
    pub fn blooms_visited(&self) -> &[BloomId] {
        &self.blooms_visited
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Merges reflection tags into the session (set union).
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session has already completed
    pub fn merge_tags(&mut self, tags: &TagSet) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.tone_tags.extend(tags.iter().cloned());
        Ok(())
    }

    /// Records the archetype returned by a reflection. Last non-null
    /// write wins; in practice only the terminal bloom produces one.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session has already completed
    pub fn set_archetype(&mut self, archetype: Archetype) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.archetype = Some(archetype);
        Ok(())
    }

    /// Records a visit to a bloom. Revisits (back-navigation) are ignored
    /// so the visited list stays duplicate-free.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session has already completed
    pub fn visit(&mut self, bloom_id: BloomId) -> Result<(), DomainError> {
        self.ensure_active()?;
        if !self.blooms_visited.contains(&bloom_id) {
            self.blooms_visited.push(bloom_id);
        }
        Ok(())
    }

    /// Completes the session. Terminal: a completed session can never
    /// transition again.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already completed
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session is already completed",
            ));
        }
        self.completed_at = Some(Timestamp::now());
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_completed() {
            Err(DomainError::new(
                ErrorCode::SessionCompleted,
                "Cannot modify a completed session",
            ))
        } else {
            Ok(())
        }
    }
}
