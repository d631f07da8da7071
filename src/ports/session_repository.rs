//! Session repository port.
//!
//! Lookup misses are represented as `Ok(None)`, never as errors; callers
//! must handle absence explicitly.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::Session;

/// Record store contract for session snapshots.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Overwrite an existing session snapshot.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session was never saved
    /// - `StorageError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// All sessions, ordered by `started_at` descending.
    async fn list_all(&self) -> Result<Vec<Session>, DomainError>;

    /// Number of completed sessions (progressive-unlock input).
    async fn count_completed(&self) -> Result<u32, DomainError>;

    /// Remove every session. Destructive.
    async fn clear(&self) -> Result<(), DomainError>;
}
