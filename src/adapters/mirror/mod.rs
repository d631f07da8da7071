//! Mirror provider adapters: the local rule-based strategy and the
//! remote-service-backed strategy.

mod remote;
mod rule_based;

pub use remote::{
    ReflectionServiceClient, ReflectionServiceConfig, ReflectionServiceError, RemoteMirror,
    RemoteSession,
};
pub use rule_based::RuleBasedMirror;
