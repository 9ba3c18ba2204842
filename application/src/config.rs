//! Application-level configuration.
//!
//! [`PollSettings`] holds the knobs the orchestrator reads at poll start
//! and on `reload` — never mid-poll, except for the two mode flags the
//! operator can toggle explicitly.

use std::time::Duration;
use tally_domain::{ChoiceMode, DisplayMode};

/// Runtime settings for poll presentation and counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// How live polls and results are rendered
    pub display_mode: DisplayMode,
    /// Whether one participant holds one or many selections
    pub choice_mode: ChoiceMode,
    /// How long results stay visible after a poll ends
    pub results_display: Duration,
    /// Cadence of the polled table refresh in chat display mode
    pub refresh_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            choice_mode: ChoiceMode::default(),
            results_display: Duration::from_secs(60),
            refresh_interval: Duration::from_secs(5),
        }
    }
}

impl PollSettings {
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_choice_mode(mut self, mode: ChoiceMode) -> Self {
        self.choice_mode = mode;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}
