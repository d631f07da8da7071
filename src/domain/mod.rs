//! Domain layer: pure types and decision logic.
//!
//! Everything in this module is synchronous and side-effect-free. The
//! rule-based components (signal extraction, archetype selection, unlock
//! calculation) are total functions with no failure mode.

pub mod archetype;
pub mod bloom;
pub mod foundation;
pub mod journal;
pub mod session;
pub mod signals;
pub mod unlock;
