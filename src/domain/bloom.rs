//! The fixed, ordered catalog of guided prompts ("blooms").
//!
//! Catalog order is significant: it defines both the session sequence and
//! the progressive-unlock gating. The first three blooms are available to a
//! first-time journaler; the rest unlock across completed sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bloom, e.g. `"B1"`.
///
/// Deliberately open (not a closed enum): persisted records and remote
/// responses may reference ids outside the current catalog, and the
/// rule-based strategy must answer them with a neutral fallback rather
/// than fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BloomId(String);

impl BloomId {
    /// Creates a bloom id from a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BloomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BloomId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One step in the guided sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bloom {
    id: &'static str,
    title: &'static str,
    prompt: &'static str,
    placeholder: &'static str,
}

impl Bloom {
    /// Returns the bloom's identifier.
    pub fn id(&self) -> BloomId {
        BloomId::new(self.id)
    }

    /// Returns the display title.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Returns the full prompt text shown to the journaler.
    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    /// Returns the input placeholder text.
    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    /// Returns the full catalog in canonical order.
    pub fn catalog() -> &'static [Bloom] {
        CATALOG
    }

    /// Number of blooms in the catalog.
    pub const COUNT: usize = 8;

    /// Looks up a bloom by id. Returns `None` for ids outside the catalog.
    pub fn by_id(id: &BloomId) -> Option<&'static Bloom> {
        CATALOG.iter().find(|b| b.id == id.as_str())
    }

    /// Returns the bloom at the given 0-based catalog index.
    pub fn by_index(index: usize) -> Option<&'static Bloom> {
        CATALOG.get(index)
    }

    /// Returns the 0-based index of this bloom in the catalog.
    pub fn order_index(&self) -> usize {
        CATALOG
            .iter()
            .position(|b| b.id == self.id)
            .expect("Bloom must be in the catalog")
    }

    /// Returns the terminal bloom (the Archetype Mirror).
    pub fn terminal() -> &'static Bloom {
        &CATALOG[Self::COUNT - 1]
    }

    /// True if this bloom is the terminal one.
    pub fn is_terminal(&self) -> bool {
        self.id == Self::terminal().id
    }
}

const CATALOG: &[Bloom] = &[
    Bloom {
        id: "B1",
        title: "Opening Reflection",
        prompt: "Something feels a little different about you today.\n\n\
                 Have you noticed it? Maybe it's a whisper, maybe it's louder.\n\n\
                 Let's lean in together and see what it wants to show you.",
        placeholder: "What feels different today?",
    },
    Bloom {
        id: "B2",
        title: "Feelings",
        prompt: "Feelings move like weather across your inner sky.\n\n\
                 Some drift past gently, others settle in heavy.\n\n\
                 What's the feeling that's most present with you right now?\n\n\
                 Don't judge it \u{2014} just name it. Let's sit with it together.",
        placeholder: "Name the feeling that's with you...",
    },
    Bloom {
        id: "B3",
        title: "Beliefs",
        prompt: "Sometimes it isn't the moment itself that feels heavy \u{2014}\n\
                 it's the belief wrapped around it.\n\n\
                 Can you sense one of those today?\n\
                 A thought like 'I should\u{2026}' or 'I can't\u{2026}'\n\n\
                 Go ahead, name it here.\n\
                 Once it's spoken, we can give it room to breathe.",
        placeholder: "What belief feels heavy today?",
    },
    Bloom {
        id: "B4",
        title: "Challenges as Catalyst",
        prompt: "Challenges can feel like walls, but often they're doorways in disguise.\n\n\
                 Is there a challenge right now that feels sharp, sticky, or heavy?\n\n\
                 Write it here \u{2014} not to fix it, but to hold it up to the light.\n\
                 Let's see what it might be trying to open for you.",
        placeholder: "What challenge is calling for your attention?",
    },
    Bloom {
        id: "B5",
        title: "Guidance",
        prompt: "Close your eyes for a breath.\n\n\
                 If you could hear a kind, wise voice whispering to you right now\u{2026}\n\
                 what would it say?\n\n\
                 Don't force it \u{2014} just let the first words arrive,\n\
                 as if they've been waiting for you all along.",
        placeholder: "What guidance is whispering to you?",
    },
    Bloom {
        id: "B6",
        title: "Invitation",
        prompt: "Every moment carries an invitation \u{2014}\n\
                 a small step that feels lighter, truer, more you.\n\n\
                 What feels like the invitation here?\n\
                 Not a grand plan, just the next gentle step.\n\n\
                 Let it show itself.",
        placeholder: "What gentle step is calling you?",
    },
    Bloom {
        id: "B7",
        title: "Integration",
        prompt: "Take a breath. Feel what's shifted in you during this spiral.\n\n\
                 Maybe it's soft, maybe it's subtle, but something's here.\n\n\
                 If you had to name what you're carrying forward,\n\
                 what would you call it?",
        placeholder: "What are you carrying forward?",
    },
    Bloom {
        id: "B8",
        title: "Archetype Mirror",
        prompt: "There's a presence walking beside you right now.\n\
                 Soft, steady, patient.\n\n\
                 Let's see who shows up to meet you today...",
        placeholder: "Feel into the presence with you...",
    },
];
