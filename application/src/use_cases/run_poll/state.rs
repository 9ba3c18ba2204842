//! Orchestrator state machine types

use crate::ports::config_source::ConfigError;
use crate::use_cases::run_poll::session::VoteSession;
use std::sync::Arc;
use tally_domain::{ChannelName, ChoiceMode, DisplayMode, DomainError, ParticipantScope, VoteOptions};
use thiserror::Error;

/// Errors reported to the operator by orchestrator commands
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("a poll is already running")]
    PollAlreadyRunning,

    #[error("no poll is currently running")]
    NoActivePoll,

    #[error(transparent)]
    InvalidRequest(#[from] DomainError),

    #[error(transparent)]
    ConfigReload(#[from] ConfigError),

    #[error("the poll orchestrator has shut down")]
    ShutDown,
}

/// Internal lifecycle state of the orchestrator.
///
/// `Idle` → `Connecting` → `Active` → `Stopping` → `Idle`. All
/// transitions happen on the event loop, so no state is ever observed
/// mid-transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollState {
    Idle,
    /// Start accepted, transport handshake in flight on a worker task.
    /// `stop_requested` defers teardown to the handshake's completion so
    /// the connection can never leak.
    Connecting { stop_requested: bool },
    Active,
    Stopping,
}

impl PollState {
    pub fn phase(self) -> PollPhase {
        match self {
            PollState::Idle => PollPhase::Idle,
            PollState::Connecting { .. } => PollPhase::Connecting,
            PollState::Active => PollPhase::Active,
            PollState::Stopping => PollPhase::Stopping,
        }
    }
}

/// Operator-visible lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Connecting,
    Active,
    Stopping,
}

impl std::fmt::Display for PollPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollPhase::Idle => write!(f, "idle"),
            PollPhase::Connecting => write!(f, "connecting"),
            PollPhase::Active => write!(f, "active"),
            PollPhase::Stopping => write!(f, "stopping"),
        }
    }
}

/// Input for starting a poll
#[derive(Debug, Clone)]
pub struct StartPollRequest {
    pub duration_secs: u64,
    pub channel: String,
    pub options: Vec<String>,
    pub scope: ParticipantScope,
}

/// Point-in-time view of the orchestrator for status queries
#[derive(Debug, Clone)]
pub struct PollStatus {
    pub phase: PollPhase,
    pub channel: Option<ChannelName>,
    pub remaining_secs: Option<u64>,
    pub display_mode: DisplayMode,
    pub choice_mode: ChoiceMode,
}

/// Result of a `reload` command
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    /// Present when a live poll had to be interrupted for the reload
    pub interrupted: Option<InterruptedPoll>,
}

/// A poll that was cut short by a reload
#[derive(Debug, Clone)]
pub struct InterruptedPoll {
    pub channel: ChannelName,
    pub remaining_secs: u64,
}

/// All per-poll state the orchestrator owns while a poll exists.
///
/// Cleared as one unit when the poll ends; the invariant is that this is
/// `Some` exactly while remaining time is positive or a stop is in
/// flight.
pub(crate) struct LivePoll {
    pub session: Arc<VoteSession>,
    pub options: VoteOptions,
    pub channel: ChannelName,
    pub scope: ParticipantScope,
    pub total_secs: u64,
    pub remaining_secs: u64,
}
