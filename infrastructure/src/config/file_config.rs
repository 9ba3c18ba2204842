//! Configuration file model
//!
//! Every key has a default, so a partial (or absent) file always yields a
//! complete configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tally_application::PollSettings;
use tally_domain::{ChoiceMode, DisplayMode};

/// Root of the `tally.toml` configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub display: FileDisplayConfig,
    pub vote: FileVoteConfig,
    pub twitch: FileTwitchConfig,
    pub archive: FileArchiveConfig,
}

/// `[display]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDisplayConfig {
    /// `scoreboard` or `chat`
    pub mode: DisplayMode,
    /// How long results stay visible after a poll ends
    pub results_display_secs: u64,
    /// Cadence of the chat-mode table refresh
    pub refresh_secs: u64,
}

impl Default for FileDisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Scoreboard,
            results_display_secs: 60,
            refresh_secs: 5,
        }
    }
}

/// `[vote]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVoteConfig {
    /// When true, only a participant's most recent valid vote counts
    pub single_choice: bool,
}

impl Default for FileVoteConfig {
    fn default() -> Self {
        Self {
            single_choice: false,
        }
    }
}

/// `[twitch]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTwitchConfig {
    /// Chat server, `host:port`
    pub server: String,
}

impl Default for FileTwitchConfig {
    fn default() -> Self {
        Self {
            server: crate::twitch::DEFAULT_CHAT_SERVER.to_string(),
        }
    }
}

/// `[archive]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArchiveConfig {
    /// JSONL file to append finished poll results to; absent = disabled
    pub path: Option<PathBuf>,
}

impl FileConfig {
    /// Map the file model onto the engine's settings.
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            display_mode: self.display.mode,
            choice_mode: if self.vote.single_choice {
                ChoiceMode::Single
            } else {
                ChoiceMode::Multi
            },
            results_display: Duration::from_secs(self.display.results_display_secs),
            // a zero cadence would spin the refresh timer
            refresh_interval: Duration::from_secs(self.display.refresh_secs.max(1)),
        }
    }
}
