//! File-backed record store.
//!
//! Persists all records as one versioned JSON document. The document is
//! loaded once at open, held in memory, and rewritten on every mutation.
//!
//! # Schema versions
//!
//! - v1: session rows carried only a numeric row key
//! - v2: session rows carry a stable `uuid`; opening a v1 document
//!   backfills the uuid from the row's own key, once, at upgrade

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::archetype::Archetype;
use crate::domain::bloom::BloomId;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::journal::{JournalEntry, Reflection};
use crate::domain::session::Session;
use crate::domain::signals::TagSet;
use crate::ports::{JournalRepository, ReflectionRepository, SessionRepository};

const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRow {
    key: u64,
    #[serde(default)]
    uuid: Option<SessionId>,
    started_at: Timestamp,
    #[serde(default)]
    completed_at: Option<Timestamp>,
    #[serde(default)]
    tone_tags: TagSet,
    #[serde(default)]
    archetype: Option<Archetype>,
    #[serde(default)]
    blooms_visited: Vec<BloomId>,
}

impl SessionRow {
    fn session_id(&self) -> SessionId {
        self.uuid
            .unwrap_or_else(|| SessionId::from_row_key(self.key))
    }

    fn to_session(&self) -> Session {
        Session::reconstitute(
            self.session_id(),
            self.started_at,
            self.completed_at,
            self.tone_tags.clone(),
            self.archetype,
            self.blooms_visited.clone(),
        )
    }

    fn apply(&mut self, session: &Session) {
        self.started_at = *session.started_at();
        self.completed_at = session.completed_at().copied();
        self.tone_tags = session.tone_tags().clone();
        self.archetype = session.archetype();
        self.blooms_visited = session.blooms_visited().to_vec();
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: u32,
    next_row_key: u64,
    sessions: Vec<SessionRow>,
    journal_entries: Vec<JournalEntry>,
    reflections: Vec<Reflection>,
}

impl StoreDocument {
    fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_row_key: 1,
            sessions: Vec::new(),
            journal_entries: Vec::new(),
            reflections: Vec::new(),
        }
    }

    /// Upgrades older documents in place. Returns true if anything changed.
    fn migrate(&mut self) -> bool {
        if self.schema_version >= SCHEMA_VERSION {
            return false;
        }

        // v1 -> v2: backfill stable session identifiers from row keys.
        let mut backfilled = 0;
        for row in &mut self.sessions {
            if row.uuid.is_none() {
                row.uuid = Some(SessionId::from_row_key(row.key));
                backfilled += 1;
            }
        }
        info!(
            from = self.schema_version,
            to = SCHEMA_VERSION,
            backfilled, "migrated store document"
        );
        self.schema_version = SCHEMA_VERSION;
        true
    }
}

/// JSON-file implementation of the persistence gateway.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    doc: Arc<RwLock<StoreDocument>>,
}

impl FileStore {
    /// Opens (or creates) the store at `path`, running any pending schema
    /// migration before returning.
    ///
    /// # Errors
    ///
    /// - `StorageError` if the file cannot be read, parsed, or written
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        let mut doc = if fs::try_exists(&path)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
        {
            let raw = fs::read_to_string(&path)
                .await
                .map_err(|e| DomainError::storage(e.to_string()))?;
            serde_json::from_str(&raw)
                .map_err(|e| DomainError::storage(format!("corrupt store document: {e}")))?
        } else {
            StoreDocument::empty()
        };

        let migrated = doc.migrate();
        let store = Self {
            path,
            doc: Arc::new(RwLock::new(doc)),
        };

        if migrated {
            let doc = store.doc.read().await;
            store.persist(&doc).await?;
        }

        Ok(store)
    }

    async fn persist(&self, doc: &StoreDocument) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| DomainError::storage(e.to_string()))?;
        fs::write(&self.path, json)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        debug!(path = %self.path.display(), "store document written");
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for FileStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        let mut row = SessionRow {
            key: doc.next_row_key,
            uuid: Some(*session.id()),
            started_at: *session.started_at(),
            completed_at: None,
            tone_tags: TagSet::new(),
            archetype: None,
            blooms_visited: Vec::new(),
        };
        row.apply(session);
        doc.next_row_key += 1;
        doc.sessions.push(row);
        self.persist(&doc).await
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        let Some(row) = doc
            .sessions
            .iter_mut()
            .find(|r| r.session_id() == *session.id())
        else {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session {} was never saved", session.id()),
            ));
        };
        row.apply(session);
        self.persist(&doc).await
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let doc = self.doc.read().await;
        Ok(doc
            .sessions
            .iter()
            .find(|r| r.session_id() == *id)
            .map(SessionRow::to_session))
    }

    async fn list_all(&self) -> Result<Vec<Session>, DomainError> {
        let doc = self.doc.read().await;
        let mut sessions: Vec<Session> = doc.sessions.iter().map(SessionRow::to_session).collect();
        sessions.sort_by(|a, b| b.started_at().cmp(a.started_at()));
        Ok(sessions)
    }

    async fn count_completed(&self) -> Result<u32, DomainError> {
        let doc = self.doc.read().await;
        Ok(doc
            .sessions
            .iter()
            .filter(|r| r.completed_at.is_some())
            .count() as u32)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        doc.sessions.clear();
        self.persist(&doc).await
    }
}

#[async_trait]
impl JournalRepository for FileStore {
    async fn upsert(&self, entry: &JournalEntry) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        doc.journal_entries
            .retain(|e| !(e.session_id == entry.session_id && e.bloom_id == entry.bloom_id));
        doc.journal_entries.push(entry.clone());
        self.persist(&doc).await
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<JournalEntry>, DomainError> {
        let doc = self.doc.read().await;
        let mut entries: Vec<JournalEntry> = doc
            .journal_entries
            .iter()
            .filter(|e| &e.session_id == session_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        doc.journal_entries.clear();
        self.persist(&doc).await
    }
}

#[async_trait]
impl ReflectionRepository for FileStore {
    async fn upsert(&self, reflection: &Reflection) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        doc.reflections.retain(|r| {
            !(r.session_id == reflection.session_id && r.bloom_id == reflection.bloom_id)
        });
        doc.reflections.push(reflection.clone());
        self.persist(&doc).await
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Reflection>, DomainError> {
        let doc = self.doc.read().await;
        let mut reflections: Vec<Reflection> = doc
            .reflections
            .iter()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect();
        reflections.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reflections)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut doc = self.doc.write().await;
        doc.reflections.clear();
        self.persist(&doc).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signals::ToneTag;
    use tempfile::tempdir;

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");

        let session = Session::new(SessionId::new());
        {
            let store = FileStore::open(&path).await.unwrap();
            store.save(&session).await.unwrap();
            JournalRepository::upsert(
                &store,
                &JournalEntry::new(*session.id(), BloomId::new("B1"), "what stirred"),
            )
            .await
            .unwrap();
        }

        let reopened = FileStore::open(&path).await.unwrap();
        let found = reopened.find_by_id(session.id()).await.unwrap();
        assert_eq!(found, Some(session.clone()));

        let entries = JournalRepository::list_by_session(&reopened, session.id())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "what stirred");
    }

    #[tokio::test]
    async fn update_roundtrips_session_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let store = FileStore::open(&path).await.unwrap();

        let mut session = Session::new(SessionId::new());
        store.save(&session).await.unwrap();

        session
            .merge_tags(&[ToneTag::new("trust")].into_iter().collect())
            .unwrap();
        session.visit(BloomId::new("B1")).unwrap();
        session.complete().unwrap();
        SessionRepository::update(&store, &session).await.unwrap();

        let reopened = FileStore::open(&path).await.unwrap();
        let found = reopened.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(found.is_completed());
        assert!(found.tone_tags().contains(&ToneTag::new("trust")));
        assert_eq!(reopened.count_completed().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_unsaved_session_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("journal.json")).await.unwrap();

        let result = SessionRepository::update(&store, &Session::new(SessionId::new())).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn upsert_overwrites_by_session_and_bloom() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("journal.json")).await.unwrap();
        let session_id = SessionId::new();

        ReflectionRepository::upsert(
            &store,
            &Reflection::new(session_id, BloomId::new("B2"), "first", vec![]),
        )
        .await
        .unwrap();
        ReflectionRepository::upsert(
            &store,
            &Reflection::new(session_id, BloomId::new("B2"), "second", vec![]),
        )
        .await
        .unwrap();

        let reflections = ReflectionRepository::list_by_session(&store, &session_id)
            .await
            .unwrap();
        assert_eq!(reflections.len(), 1);
        assert_eq!(reflections[0].text, "second");
    }

    #[tokio::test]
    async fn migrates_v1_document_backfilling_session_uuid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");

        // A v1 document: session rows have no uuid field.
        let v1 = serde_json::json!({
            "schema_version": 1,
            "next_row_key": 3,
            "sessions": [
                { "key": 1, "started_at": "2024-01-15T10:30:00Z" },
                { "key": 2, "started_at": "2024-02-20T08:00:00Z",
                  "completed_at": "2024-02-20T08:40:00Z" }
            ],
            "journal_entries": [],
            "reflections": []
        });
        std::fs::write(&path, serde_json::to_string_pretty(&v1).unwrap()).unwrap();

        let store = FileStore::open(&path).await.unwrap();

        let sessions = store.list_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(store.count_completed().await.unwrap(), 1);

        // Backfilled ids are derived from row keys, so lookups are stable.
        let expected = SessionId::from_row_key(1);
        assert!(store.find_by_id(&expected).await.unwrap().is_some());

        // The upgrade was persisted: reopening sees a v2 document.
        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["schema_version"], 2);
        assert!(doc["sessions"][0]["uuid"].is_string());
    }

    #[tokio::test]
    async fn migration_runs_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");

        let v1 = serde_json::json!({
            "schema_version": 1,
            "next_row_key": 2,
            "sessions": [{ "key": 1, "started_at": "2024-01-15T10:30:00Z" }],
            "journal_entries": [],
            "reflections": []
        });
        std::fs::write(&path, serde_json::to_string(&v1).unwrap()).unwrap();

        let first = FileStore::open(&path).await.unwrap();
        let id = *first.list_all().await.unwrap()[0].id();
        drop(first);

        // Second open must not re-derive or change identifiers.
        let second = FileStore::open(&path).await.unwrap();
        assert_eq!(*second.list_all().await.unwrap()[0].id(), id);
    }

    #[tokio::test]
    async fn corrupt_document_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = FileStore::open(&path).await;
        assert_eq!(result.unwrap_err().code, ErrorCode::StorageError);
    }
}
