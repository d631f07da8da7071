//! In-memory record store.
//!
//! Implements all three repository ports over shared maps. Useful for
//! tests and for ephemeral sessions that should leave no trace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::bloom::BloomId;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::journal::{JournalEntry, Reflection};
use crate::domain::session::Session;
use crate::ports::{JournalRepository, ReflectionRepository, SessionRepository};

/// In-memory implementation of the persistence gateway.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    entries: Arc<RwLock<HashMap<(SessionId, BloomId), JournalEntry>>>,
    reflections: Arc<RwLock<HashMap<(SessionId, BloomId), Reflection>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (test convenience).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of stored journal entries (test convenience).
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Number of stored reflections (test convenience).
    pub async fn reflection_count(&self) -> usize {
        self.reflections.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session {} was never saved", session.id()),
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.started_at().cmp(a.started_at()));
        Ok(sessions)
    }

    async fn count_completed(&self) -> Result<u32, DomainError> {
        let count = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_completed())
            .count();
        Ok(count as u32)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.sessions.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl JournalRepository for InMemoryStore {
    async fn upsert(&self, entry: &JournalEntry) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert((entry.session_id, entry.bloom_id.clone()), entry.clone());
        Ok(())
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<JournalEntry>, DomainError> {
        let mut entries: Vec<JournalEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| &e.session_id == session_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[async_trait]
impl ReflectionRepository for InMemoryStore {
    async fn upsert(&self, reflection: &Reflection) -> Result<(), DomainError> {
        self.reflections.write().await.insert(
            (reflection.session_id, reflection.bloom_id.clone()),
            reflection.clone(),
        );
        Ok(())
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Reflection>, DomainError> {
        let mut reflections: Vec<Reflection> = self
            .reflections
            .read()
            .await
            .values()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect();
        reflections.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reflections)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.reflections.write().await.clear();
        Ok(())
    }
}
