//! Runtime-mutable poll presentation and counting modes
//!
//! Both modes can be toggled by operator commands while a poll is live;
//! the active poll is re-rendered in the new mode without restarting its
//! timers.

use serde::{Deserialize, Serialize};

/// How the live poll and its results are rendered to the audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Push-rendered panel with live counts read through a provider
    Scoreboard,
    /// Textual table re-sent on the periodic refresh cadence
    Chat,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Scoreboard => DisplayMode::Chat,
            DisplayMode::Chat => DisplayMode::Scoreboard,
        }
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Scoreboard
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Scoreboard => write!(f, "scoreboard"),
            DisplayMode::Chat => write!(f, "chat"),
        }
    }
}

/// How many selections a single participant may hold at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMode {
    /// Selections accumulate; one participant may back several options
    Multi,
    /// Only the most recent valid selection persists
    Single,
}

impl ChoiceMode {
    pub fn toggle(self) -> Self {
        match self {
            ChoiceMode::Multi => ChoiceMode::Single,
            ChoiceMode::Single => ChoiceMode::Multi,
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, ChoiceMode::Single)
    }

    /// Audience-facing description of the mode
    pub fn describe(self) -> &'static str {
        match self {
            ChoiceMode::Multi => "multiple votes count",
            ChoiceMode::Single => "last vote only",
        }
    }
}

impl Default for ChoiceMode {
    fn default() -> Self {
        ChoiceMode::Multi
    }
}

impl std::fmt::Display for ChoiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoiceMode::Multi => write!(f, "multi"),
            ChoiceMode::Single => write!(f, "single"),
        }
    }
}
