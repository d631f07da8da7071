//! Terminal harness for a guided reflection session.
//!
//! Walks the journaler through the unlocked blooms one at a time:
//! prompt, journal text, mirrored reflection, next bloom. `archive`
//! lists past sessions; `clear` erases them.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mirror_hall::adapters::{
    FileStore, InMemoryStore, ReflectionServiceClient, ReflectionServiceConfig, RemoteMirror,
    RuleBasedMirror,
};
use mirror_hall::application::{Advance, ArchiveReader, SessionEngine};
use mirror_hall::config::{AppConfig, MirrorStrategy, StorageBackend};
use mirror_hall::domain::bloom::Bloom;
use mirror_hall::domain::foundation::ErrorCode;
use mirror_hall::domain::unlock::UnlockCalculator;
use mirror_hall::ports::{
    JournalRepository, MirrorProvider, ReflectionRepository, SessionRepository,
};

struct Stores {
    sessions: Arc<dyn SessionRepository>,
    entries: Arc<dyn JournalRepository>,
    reflections: Arc<dyn ReflectionRepository>,
}

async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn Error>> {
    Ok(match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::open(config.storage.data_path()).await?;
            Stores {
                sessions: Arc::new(store.clone()),
                entries: Arc::new(store.clone()),
                reflections: Arc::new(store),
            }
        }
        StorageBackend::Memory => {
            let store = InMemoryStore::new();
            Stores {
                sessions: Arc::new(store.clone()),
                entries: Arc::new(store.clone()),
                reflections: Arc::new(store),
            }
        }
    })
}

fn build_mirror(config: &AppConfig) -> Result<Arc<dyn MirrorProvider>, Box<dyn Error>> {
    Ok(match config.mirror.strategy {
        MirrorStrategy::RuleBased => Arc::new(RuleBasedMirror::new()),
        MirrorStrategy::Remote => {
            let url = config
                .mirror
                .service_url
                .clone()
                .unwrap_or_default();
            let mut service = ReflectionServiceConfig::new(url).with_timeout(config.mirror.timeout());
            if let Some(key) = &config.mirror.api_key {
                service = service.with_api_key(key.clone());
            }
            Arc::new(RemoteMirror::new(ReflectionServiceClient::new(service)?))
        }
    })
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end().to_string()))
}

async fn run_session(stores: Stores, mirror: Arc<dyn MirrorProvider>) -> Result<(), Box<dyn Error>> {
    let completed = stores.sessions.count_completed().await?;
    let level = UnlockCalculator::calculate(completed);

    let mut engine = SessionEngine::new(
        stores.sessions,
        stores.entries,
        stores.reflections,
        mirror,
    );

    println!("{}\n", level.unlock_message());
    let mut bloom = engine.start(level).await?;

    loop {
        println!("── {} ──", bloom.title());
        println!("{}\n", bloom.prompt());

        let Some(line) = read_line(&format!("[{}] > ", bloom.placeholder()))? else {
            println!("\nUntil next time.");
            return Ok(());
        };

        match line.as_str() {
            ":quit" => {
                println!("Until next time.");
                return Ok(());
            }
            ":back" => {
                match engine.go_back() {
                    Ok(previous) => bloom = previous,
                    Err(e) => println!("({})", e.message),
                }
                println!();
                continue;
            }
            _ => {}
        }

        let reflection = match engine.submit(&line).await {
            Ok(reflection) => reflection,
            Err(e) if e.code == ErrorCode::EmptyJournalText => {
                println!("Take your time. A few words are enough.\n");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!("\n{}\n", reflection.text);

        match engine.advance().await? {
            Advance::Next(next) => bloom = next,
            Advance::Finished(session) => {
                if let Some(archetype) = session.archetype() {
                    println!("Today's presence: {}", archetype.display_name());
                }
                println!("{}", level.next_unlock_hint());
                return Ok(());
            }
        }
    }
}

async fn show_archive(stores: Stores) -> Result<(), Box<dyn Error>> {
    let reader = ArchiveReader::new(stores.sessions, stores.entries, stores.reflections);
    let sessions = reader.list_sessions().await?;

    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    for session in &sessions {
        let status = if session.is_completed() {
            "completed"
        } else {
            "unfinished"
        };
        let archetype = session
            .archetype()
            .map(|a| a.display_name())
            .unwrap_or("-");
        println!(
            "{}  {}  {}  blooms: {}/{}  {}",
            session.started_at().as_datetime().format("%Y-%m-%d %H:%M"),
            session.id(),
            status,
            session.blooms_visited().len(),
            Bloom::COUNT,
            archetype,
        );
    }
    Ok(())
}

async fn clear_archive(stores: Stores) -> Result<(), Box<dyn Error>> {
    let reader = ArchiveReader::new(stores.sessions, stores.entries, stores.reflections);
    reader.clear_all().await?;
    println!("Archive cleared.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load()?;
    config.validate()?;
    info!(
        strategy = ?config.mirror.strategy,
        backend = ?config.storage.backend,
        "configuration loaded"
    );

    let stores = build_stores(&config).await?;

    match std::env::args().nth(1).as_deref() {
        None => {
            let mirror = build_mirror(&config)?;
            run_session(stores, mirror).await
        }
        Some("archive") => show_archive(stores).await,
        Some("clear") => clear_archive(stores).await,
        Some(other) => {
            eprintln!("unknown command '{other}' (expected: archive, clear)");
            std::process::exit(2);
        }
    }
}
