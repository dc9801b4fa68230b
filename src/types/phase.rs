use std::fmt;

/// One of the three stages of the victory aftermath sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// The experience gauge panel.
    Experience,
    /// The dropped items panel.
    Loot,
    /// The per-actor level-up detail panel.
    LevelUp,
}

impl Phase {
    /// All phases in the order the aftermath sequence visits them.
    pub const ALL: [Phase; 3] = [Phase::Experience, Phase::Loot, Phase::LevelUp];

    /// Classify the value of a `TYPE:` tag.
    ///
    /// Matching is exact after trimming and lowercasing, so `"Exp "` is
    /// accepted but `"expert"` is not.
    #[must_use]
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exp" | "experience" => Some(Phase::Experience),
            "drop" | "loot" => Some(Phase::Loot),
            "level" | "levelup" => Some(Phase::LevelUp),
            _ => None,
        }
    }

    /// Whether rules of this phase are scoped to the entity that declared them.
    #[must_use]
    pub fn is_scoped(self) -> bool {
        matches!(self, Phase::LevelUp)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Experience => write!(f, "experience"),
            Phase::Loot => write!(f, "loot"),
            Phase::LevelUp => write!(f, "level-up"),
        }
    }
}

/// Which body of a rule was being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Condition,
    Priority,
    Effect,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Condition => write!(f, "condition"),
            Stage::Priority => write!(f, "priority"),
            Stage::Effect => write!(f, "effect"),
        }
    }
}
