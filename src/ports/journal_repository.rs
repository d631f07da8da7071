//! Journal entry repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::journal::JournalEntry;

/// Record store contract for journal entries.
///
/// Entries are keyed by `(session_id, bloom_id)`: resubmitting the same
/// bloom overwrites the stored entry rather than adding a duplicate.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Insert or overwrite the entry for its `(session_id, bloom_id)` key.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn upsert(&self, entry: &JournalEntry) -> Result<(), DomainError>;

    /// All entries for a session, ordered by `created_at` ascending.
    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<JournalEntry>, DomainError>;

    /// Remove every entry. Destructive.
    async fn clear(&self) -> Result<(), DomainError>;
}
