//! Session engine: drives one guided session from first bloom to
//! completion.
//!
//! The engine owns the in-flight [`Session`] aggregate and the cursor into
//! the bloom catalog. Every mutation follows the same discipline: mutate a
//! clone, persist it, then commit the clone into engine state. A
//! persistence failure therefore leaves the engine exactly where it was.
//!
//! The unlock level is computed by the caller (from completed-session
//! history) and handed in at [`SessionEngine::start`]; the engine only
//! enforces it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::bloom::Bloom;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::journal::{JournalEntry, Reflection};
use crate::domain::session::Session;
use crate::domain::signals::TagSet;
use crate::domain::unlock::UnlockLevel;
use crate::ports::{
    JournalRepository, MirrorProvider, MirrorRequest, ReflectionRepository, SessionRepository,
};

/// Where [`SessionEngine::advance`] landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next bloom.
    Next(&'static Bloom),
    /// The session completed; the final aggregate is returned.
    Finished(Session),
}

enum EngineState {
    Idle,
    Active {
        session: Session,
        level: UnlockLevel,
        bloom_index: usize,
        /// True once the current bloom has a stored entry/reflection pair.
        responded: bool,
    },
    Completed {
        session: Session,
    },
}

/// Drives a single guided session.
pub struct SessionEngine {
    sessions: Arc<dyn SessionRepository>,
    entries: Arc<dyn JournalRepository>,
    reflections: Arc<dyn ReflectionRepository>,
    mirror: Arc<dyn MirrorProvider>,
    state: EngineState,
}

impl SessionEngine {
    /// Creates an engine over the given ports. No session is running yet.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        entries: Arc<dyn JournalRepository>,
        reflections: Arc<dyn ReflectionRepository>,
        mirror: Arc<dyn MirrorProvider>,
    ) -> Self {
        Self {
            sessions,
            entries,
            reflections,
            mirror,
            state: EngineState::Idle,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The bloom currently awaiting a response.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` if no session is running
    /// - `SessionCompleted` if the session has finished
    pub fn current_bloom(&self) -> Result<&'static Bloom, DomainError> {
        match &self.state {
            EngineState::Active { bloom_index, .. } => Bloom::by_index(*bloom_index)
                .ok_or_else(|| {
                    DomainError::new(ErrorCode::InternalError, "Bloom cursor out of catalog range")
                }),
            EngineState::Idle => Err(not_started()),
            EngineState::Completed { .. } => Err(completed()),
        }
    }

    /// The unlock level this session runs under.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` if no session is running
    pub fn unlock_level(&self) -> Result<UnlockLevel, DomainError> {
        match &self.state {
            EngineState::Active { level, .. } => Ok(*level),
            _ => Err(not_started()),
        }
    }

    /// The in-flight (or just-finished) session aggregate.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            EngineState::Active { session, .. } | EngineState::Completed { session } => {
                Some(session)
            }
            EngineState::Idle => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a new session at the first bloom under the given unlock level.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if a session is already running
    /// - `StorageError` if the new session cannot be persisted
    pub async fn start(&mut self, level: UnlockLevel) -> Result<&'static Bloom, DomainError> {
        if matches!(self.state, EngineState::Active { .. }) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "A session is already in progress",
            ));
        }

        let first = Bloom::by_index(0).ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Bloom catalog is empty")
        })?;

        let mut session = Session::new(SessionId::new());
        session.visit(first.id())?;
        self.sessions.save(&session).await?;

        info!(
            session_id = %session.id(),
            blooms_unlocked = level.blooms_unlocked,
            "session started"
        );

        self.state = EngineState::Active {
            session,
            level,
            bloom_index: 0,
            responded: false,
        };
        Ok(first)
    }

    /// Submits the journal text for the current bloom and returns the
    /// mirror's reflection.
    ///
    /// Resubmitting the same bloom (after back-navigation) overwrites the
    /// stored entry/reflection pair rather than duplicating it.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` / `SessionCompleted` outside an active session
    /// - `EmptyJournalText` if the text is empty after trimming; nothing
    ///   is persisted in that case
    /// - `StorageError` if any write fails; the engine does not advance
    pub async fn submit(&mut self, text: &str) -> Result<Reflection, DomainError> {
        let EngineState::Active {
            session,
            bloom_index,
            responded,
            ..
        } = &mut self.state
        else {
            return Err(match self.state {
                EngineState::Completed { .. } => completed(),
                _ => not_started(),
            });
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyJournalText,
                "Journal text must not be empty",
            ));
        }

        let bloom = Bloom::by_index(*bloom_index).ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Bloom cursor out of catalog range")
        })?;

        let entry = JournalEntry::new(*session.id(), bloom.id(), trimmed);
        self.entries.upsert(&entry).await?;

        let response = self
            .mirror
            .generate(MirrorRequest {
                session_id: *session.id(),
                bloom_id: bloom.id(),
                journal_text: trimmed.to_string(),
                prior_tags: session.tone_tags().clone(),
            })
            .await;

        let reflection = Reflection::new(
            *session.id(),
            bloom.id(),
            response.text,
            response.tags.clone(),
        );
        self.reflections.upsert(&reflection).await?;

        let mut updated = session.clone();
        updated.merge_tags(&response.tags.iter().cloned().collect::<TagSet>())?;
        if let Some(archetype) = response.archetype {
            updated.set_archetype(archetype)?;
        }
        self.sessions.update(&updated).await?;

        debug!(
            session_id = %updated.id(),
            bloom = %bloom.id(),
            tags = ?response.tags,
            "reflection recorded"
        );

        *session = updated;
        *responded = true;
        Ok(reflection)
    }

    /// Moves to the next unlocked bloom, or completes the session if the
    /// current bloom was the last unlocked one.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` / `SessionCompleted` outside an active session
    /// - `ResponsePending` if the current bloom has not been answered
    /// - `StorageError` if the session update fails; the cursor stays put
    pub async fn advance(&mut self) -> Result<Advance, DomainError> {
        let EngineState::Active {
            session,
            level,
            bloom_index,
            responded,
        } = &mut self.state
        else {
            return Err(match self.state {
                EngineState::Completed { .. } => completed(),
                _ => not_started(),
            });
        };

        if !*responded {
            return Err(DomainError::new(
                ErrorCode::ResponsePending,
                "The current bloom has not been answered yet",
            ));
        }

        let next_index = *bloom_index + 1;
        if next_index < level.blooms_unlocked {
            let next = Bloom::by_index(next_index).ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, "Unlock level exceeds catalog")
            })?;

            let mut updated = session.clone();
            updated.visit(next.id())?;
            self.sessions.update(&updated).await?;

            *session = updated;
            *bloom_index = next_index;
            *responded = false;
            return Ok(Advance::Next(next));
        }

        let mut finished = session.clone();
        finished.complete()?;
        self.sessions.update(&finished).await?;

        info!(session_id = %finished.id(), "session completed");

        self.state = EngineState::Completed {
            session: finished.clone(),
        };
        Ok(Advance::Finished(finished))
    }

    /// Steps back to the previous bloom. A fresh submission there
    /// overwrites the stored pair; advancing again requires one.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` / `SessionCompleted` outside an active session
    /// - `InvalidStateTransition` if already at the first bloom
    pub fn go_back(&mut self) -> Result<&'static Bloom, DomainError> {
        let EngineState::Active {
            bloom_index,
            responded,
            ..
        } = &mut self.state
        else {
            return Err(match self.state {
                EngineState::Completed { .. } => completed(),
                _ => not_started(),
            });
        };

        if *bloom_index == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Already at the first bloom",
            ));
        }

        *bloom_index -= 1;
        *responded = false;
        Bloom::by_index(*bloom_index).ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Bloom cursor out of catalog range")
        })
    }
}

fn not_started() -> DomainError {
    DomainError::new(ErrorCode::SessionNotStarted, "No session is in progress")
}

fn completed() -> DomainError {
    DomainError::new(
        ErrorCode::SessionCompleted,
        "The session has already completed",
    )
}
