//! Adapters: concrete implementations of the ports.

pub mod mirror;
pub mod storage;

pub use mirror::{
    ReflectionServiceClient, ReflectionServiceConfig, ReflectionServiceError, RemoteMirror,
    RemoteSession, RuleBasedMirror,
};
pub use storage::{FileStore, InMemoryStore};
