//! Mirror Hall - Guided Self-Reflection Journal Engine
//!
//! This crate implements the reflection-generation pipeline and session-state
//! engine behind a guided journaling practice: eight fixed prompts ("blooms"),
//! synthesized reflective responses ("mirrors"), tone-signal extraction, and
//! progressive unlocking across completed sessions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
