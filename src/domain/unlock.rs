//! Progressive unlock: how many blooms a session may visit, derived from
//! completed-session history.
//!
//! Re-derived at every session start from persisted history rather than
//! kept as ambient mutable state, so it stays testable without a store.

use serde::{Deserialize, Serialize};

use super::bloom::Bloom;

/// Unlock state for the session about to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockLevel {
    /// Number of blooms accessible, counted from the start of the catalog.
    pub blooms_unlocked: usize,
    /// Ordinal of the session about to start (completed count + 1).
    pub total_sessions: u32,
}

impl UnlockLevel {
    /// Progress message for the journaler entering this session.
    pub fn unlock_message(&self) -> &'static str {
        match self.total_sessions {
            1 => "Welcome to your first spiral. Three blooms await your reflection.",
            2 => "Your journey deepens. Five blooms are now open to you.",
            _ => "The full spiral unfolds. All eight blooms welcome your presence.",
        }
    }

    /// Hint about what the next completed session will open up.
    pub fn next_unlock_hint(&self) -> &'static str {
        match self.blooms_unlocked {
            3 => "Complete this spiral to unlock Challenges and Guidance in your next journey.",
            5 => "One more complete spiral will open Invitation, Integration, and the Archetype Mirror.",
            _ => "You have access to the full spiral journey.",
        }
    }
}

/// Step function from completed-session count to unlock level.
///
/// Monotone non-decreasing and saturating at the catalog size. Pure and
/// total, no error cases.
pub struct UnlockCalculator;

impl UnlockCalculator {
    /// Computes the unlock level for a journaler with `completed_sessions`
    /// finished spirals behind them.
    pub fn calculate(completed_sessions: u32) -> UnlockLevel {
        let blooms_unlocked = if completed_sessions >= 2 {
            Bloom::COUNT
        } else if completed_sessions >= 1 {
            5
        } else {
            3
        };

        UnlockLevel {
            blooms_unlocked,
            total_sessions: completed_sessions + 1,
        }
    }
}
