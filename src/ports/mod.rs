//! Ports: contracts the application layer depends on.
//!
//! Adapters implement these traits; the session engine and readers only
//! ever see the trait objects.

mod journal_repository;
mod mirror_provider;
mod reflection_repository;
mod session_repository;

pub use journal_repository::JournalRepository;
pub use mirror_provider::{MirrorProvider, MirrorRequest, MirrorResponse};
pub use reflection_repository::ReflectionRepository;
pub use session_repository::SessionRepository;
