//! Archetype selection from accumulated tone signals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::signals::{TagSet, ToneTag};

/// The five persona labels a session can resolve to at the terminal bloom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Listener,
    Seeker,
    Guardian,
    Creator,
    Sage,
}

impl Archetype {
    /// Returns all archetypes.
    pub fn all() -> &'static [Archetype] {
        &[
            Archetype::Listener,
            Archetype::Seeker,
            Archetype::Guardian,
            Archetype::Creator,
            Archetype::Sage,
        ]
    }

    /// Returns the stable identifier used in persisted records and on
    /// the wire, e.g. `"listener"`.
    pub fn id(&self) -> &'static str {
        match self {
            Archetype::Listener => "listener",
            Archetype::Seeker => "seeker",
            Archetype::Guardian => "guardian",
            Archetype::Creator => "creator",
            Archetype::Sage => "sage",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Archetype::Listener => "The Listener",
            Archetype::Seeker => "The Seeker",
            Archetype::Guardian => "The Guardian",
            Archetype::Creator => "The Creator",
            Archetype::Sage => "The Sage",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listener" => Ok(Archetype::Listener),
            "seeker" => Ok(Archetype::Seeker),
            "guardian" => Ok(Archetype::Guardian),
            "creator" => Ok(Archetype::Creator),
            "sage" => Ok(Archetype::Sage),
            other => Err(UnknownArchetype(other.to_string())),
        }
    }
}

/// Returned when parsing an archetype id that is not one of the five.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown archetype id '{0}'")]
pub struct UnknownArchetype(pub String);

/// Maps accumulated tone tags to an archetype.
///
/// Evaluated as an ordered priority list; the first matching rule wins.
/// Total function: an empty or unmatched tag set falls back to Listener.
pub struct ArchetypeSelector;

impl ArchetypeSelector {
    const PRIORITY_RULES: &'static [(Archetype, [&'static str; 2])] = &[
        (Archetype::Listener, ["peace", "patience"]),
        (Archetype::Seeker, ["excitement", "uncertainty"]),
        (Archetype::Guardian, ["love", "trust"]),
        (Archetype::Creator, ["create", "strength"]),
        (Archetype::Sage, ["clarity", "heavy"]),
    ];

    /// Selects the archetype for the given tag set.
    pub fn select(tags: &TagSet) -> Archetype {
        for (archetype, triggers) in Self::PRIORITY_RULES {
            if triggers.iter().any(|t| tags.contains(&ToneTag::new(*t))) {
                return *archetype;
            }
        }
        Archetype::Listener
    }
}
