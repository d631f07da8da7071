//! Reflection repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::journal::Reflection;

/// Record store contract for reflections.
///
/// Reflections pair 1:1 with journal entries by `(session_id, bloom_id)`
/// and share the same last-write-wins upsert semantics.
#[async_trait]
pub trait ReflectionRepository: Send + Sync {
    /// Insert or overwrite the reflection for its `(session_id, bloom_id)` key.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn upsert(&self, reflection: &Reflection) -> Result<(), DomainError>;

    /// All reflections for a session, ordered by `created_at` ascending.
    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Reflection>, DomainError>;

    /// Remove every reflection. Destructive.
    async fn clear(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ReflectionRepository) {}
    }
}
