//! Session domain module.
//!
//! A session is one pass through the guided spiral: it accumulates tone
//! tags from every reflection, records which blooms were visited, and may
//! resolve to an archetype at the terminal bloom. Completion is terminal.

mod aggregate;

pub use aggregate::Session;
