//! End-to-end session flow over the real rule-based mirror.
//!
//! Exercises the full loop a journaler experiences: progressive unlock,
//! prompt, journal text, reflection, completion, archive.

use std::sync::Arc;

use mirror_hall::adapters::{FileStore, InMemoryStore, RuleBasedMirror};
use mirror_hall::application::{Advance, ArchiveReader, SessionEngine};
use mirror_hall::domain::archetype::Archetype;
use mirror_hall::domain::bloom::{Bloom, BloomId};
use mirror_hall::domain::signals::ToneTag;
use mirror_hall::domain::unlock::UnlockCalculator;
use mirror_hall::ports::{
    JournalRepository, MirrorProvider, ReflectionRepository, SessionRepository,
};

fn engine_over(
    sessions: Arc<dyn SessionRepository>,
    entries: Arc<dyn JournalRepository>,
    reflections: Arc<dyn ReflectionRepository>,
) -> SessionEngine {
    SessionEngine::new(
        sessions,
        entries,
        reflections,
        Arc::new(RuleBasedMirror::new()) as Arc<dyn MirrorProvider>,
    )
}

fn memory_engine(store: &InMemoryStore) -> SessionEngine {
    engine_over(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    )
}

#[tokio::test]
async fn first_session_walks_three_blooms_and_completes() {
    let store = InMemoryStore::new();
    let mut engine = memory_engine(&store);

    let level = UnlockCalculator::calculate(0);
    assert_eq!(level.blooms_unlocked, 3);

    let bloom = engine.start(level).await.unwrap();
    assert_eq!(bloom.id(), BloomId::new("B1"));

    // B1: "excited" trips the excitement override.
    let reflection = engine
        .submit("I woke up excited, like something wants to unfold")
        .await
        .unwrap();
    assert!(reflection.text.starts_with("There's a lightness"));
    assert!(reflection.tone_tags.contains(&ToneTag::new("excitement")));
    engine.advance().await.unwrap();

    // B2: no known signal, base text stands.
    let reflection = engine.submit("a quiet morning mood").await.unwrap();
    assert!(reflection.text.starts_with("Feelings are such honest messengers"));
    assert!(reflection.tone_tags.is_empty());
    engine.advance().await.unwrap();

    // B3: the "should" belief gets named back.
    let reflection = engine
        .submit("I keep thinking I should have figured this out by now")
        .await
        .unwrap();
    assert!(reflection.text.starts_with("Ah, the voice of 'should.'"));

    let Advance::Finished(session) = engine.advance().await.unwrap() else {
        panic!("three answered blooms should finish a first session");
    };

    assert!(session.completed_at().is_some());
    assert!(session.archetype().is_none());
    assert!(session.tone_tags().contains(&ToneTag::new("excitement")));
    assert!(session.tone_tags().contains(&ToneTag::new("should")));
    assert_eq!(store.count_completed().await.unwrap(), 1);

    // The next session unlocks five blooms.
    let next = UnlockCalculator::calculate(store.count_completed().await.unwrap());
    assert_eq!(next.blooms_unlocked, 5);
}

#[tokio::test]
async fn full_spiral_resolves_an_archetype() {
    let store = InMemoryStore::new();
    let mut engine = memory_engine(&store);

    // Veteran journaler: all eight blooms open.
    engine
        .start(UnlockCalculator::calculate(2))
        .await
        .unwrap();

    // Tags accumulate across the spiral; love and trust make a Guardian.
    let texts = [
        "something is stirring",
        "my heart feels full of love today",
        "a belief about what I owe everyone",
        "the same wall as always",
        "I trust the quiet voice underneath",
        "one small step",
        "carrying forward some steadiness",
        "just being here",
    ];

    let mut finished = None;
    for text in texts {
        engine.submit(text).await.unwrap();
        if let Advance::Finished(session) = engine.advance().await.unwrap() {
            finished = Some(session);
        }
    }

    let session = finished.expect("eight answered blooms should finish the spiral");
    assert_eq!(session.archetype(), Some(Archetype::Guardian));
    assert_eq!(session.blooms_visited().len(), Bloom::COUNT);

    // The terminal reflection mirrors the archetype back.
    let reflections = ReflectionRepository::list_by_session(&store, session.id())
        .await
        .unwrap();
    let terminal = reflections
        .iter()
        .find(|r| r.bloom_id == BloomId::new("B8"))
        .unwrap();
    assert!(terminal.text.starts_with("The Guardian"));
}

#[tokio::test]
async fn archive_bundles_everything_written_in_a_session() {
    let store = InMemoryStore::new();
    let mut engine = memory_engine(&store);

    engine.start(UnlockCalculator::calculate(0)).await.unwrap();
    for text in ["one", "two", "three"] {
        engine.submit(text).await.unwrap();
        engine.advance().await.unwrap();
    }
    let session_id = *engine.session().unwrap().id();

    let reader = ArchiveReader::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    let listed = reader.list_sessions().await.unwrap();
    assert_eq!(listed.len(), 1);

    let detail = reader.session_detail(&session_id).await.unwrap().unwrap();
    assert_eq!(detail.entries.len(), 3);
    assert_eq!(detail.reflections.len(), 3);
    assert!(detail.session.is_completed());

    reader.clear_all().await.unwrap();
    assert!(reader.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn unlock_progress_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.json");

    // First run: complete a three-bloom session and drop everything.
    {
        let store = FileStore::open(&path).await.unwrap();
        let mut engine = engine_over(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        );
        engine.start(UnlockCalculator::calculate(0)).await.unwrap();
        for text in ["one", "two", "three"] {
            engine.submit(text).await.unwrap();
            engine.advance().await.unwrap();
        }
    }

    // Second run: history is on disk, five blooms unlock.
    let store = FileStore::open(&path).await.unwrap();
    let completed = store.count_completed().await.unwrap();
    assert_eq!(completed, 1);
    assert_eq!(UnlockCalculator::calculate(completed).blooms_unlocked, 5);

    let mut engine = engine_over(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store),
    );
    let bloom = engine
        .start(UnlockCalculator::calculate(completed))
        .await
        .unwrap();
    assert_eq!(bloom.id(), BloomId::new("B1"));
}
