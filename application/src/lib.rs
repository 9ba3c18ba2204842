//! Application layer for twitch-tally
//!
//! This crate contains the poll lifecycle use cases, port definitions,
//! and application configuration. It depends only on the domain layer.
//!
//! The two concurrency domains of the system meet here:
//!
//! - the **scheduling domain** — a single event loop owning all
//!   orchestrator state, driven by operator commands and timer events;
//! - the **ingestion domain** — the chat transport's delivery context,
//!   which writes into the tally through a shared sink without ever
//!   touching orchestrator state.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PollSettings;
pub use ports::{
    chat_transport::{ChatConnection, ChatTransport, MessageSink, TransportError},
    config_source::{ConfigError, ConfigSource, StaticConfigSource},
    poll_archive::{NoArchive, PollArchive, PollRecord},
    poll_display::{ActivePollView, CountsProvider, PollDisplay, PollResultsView},
};
pub use use_cases::run_poll::{
    InterruptedPoll, OrchestratorError, OrchestratorHandle, PollPhase, PollStatus, ReloadOutcome,
    SessionOrchestrator, StartPollRequest, VoteSession,
};
