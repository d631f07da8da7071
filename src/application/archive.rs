//! Archive reader: the read side over past sessions.
//!
//! Pure queries plus one destructive reset; never touches an in-flight
//! session.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::journal::{JournalEntry, Reflection};
use crate::domain::session::Session;
use crate::ports::{JournalRepository, ReflectionRepository, SessionRepository};

/// A session together with everything written during it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetail {
    pub session: Session,
    /// Journal entries in the order they were written.
    pub entries: Vec<JournalEntry>,
    /// Reflections in the order they were produced.
    pub reflections: Vec<Reflection>,
}

/// Read-side access to the session archive.
pub struct ArchiveReader {
    sessions: Arc<dyn SessionRepository>,
    entries: Arc<dyn JournalRepository>,
    reflections: Arc<dyn ReflectionRepository>,
}

impl ArchiveReader {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        entries: Arc<dyn JournalRepository>,
        reflections: Arc<dyn ReflectionRepository>,
    ) -> Self {
        Self {
            sessions,
            entries,
            reflections,
        }
    }

    /// All sessions, most recent first.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, DomainError> {
        self.sessions.list_all().await
    }

    /// One session with its entries and reflections, or `None` if the id
    /// is unknown.
    pub async fn session_detail(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionDetail>, DomainError> {
        let Some(session) = self.sessions.find_by_id(id).await? else {
            return Ok(None);
        };

        let entries = self.entries.list_by_session(id).await?;
        let reflections = self.reflections.list_by_session(id).await?;

        Ok(Some(SessionDetail {
            session,
            entries,
            reflections,
        }))
    }

    /// Erases the whole archive: sessions, entries, and reflections.
    pub async fn clear_all(&self) -> Result<(), DomainError> {
        self.sessions.clear().await?;
        self.entries.clear().await?;
        self.reflections.clear().await?;
        info!("archive cleared");
        Ok(())
    }
}
