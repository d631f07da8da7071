//! Application layer: orchestrates domain logic over the ports.

mod archive;
mod engine;

pub use archive::{ArchiveReader, SessionDetail};
pub use engine::{Advance, SessionEngine};
