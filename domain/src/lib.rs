//! Domain layer for twitch-tally
//!
//! This crate contains the core poll logic: option sets, durations,
//! participant identities, the concurrent vote tally, selection parsing,
//! and winner computation. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Poll
//!
//! A poll is a fixed, ordered list of 1..=20 labelled options. Option *N*
//! is addressed by its 1-based number; chat participants select options by
//! typing numbers into the channel.
//!
//! ## Tally
//!
//! [`TallyStore`] maps each participant to the set of option numbers they
//! currently have selected. It is safe to mutate from the chat delivery
//! context while snapshots are read elsewhere.

pub mod chat;
pub mod core;
pub mod poll;
pub mod tally;

// Re-export commonly used types
pub use chat::{channel::ChannelName, message::ChatMessage, participant::Participant};
pub use core::error::DomainError;
pub use poll::{
    duration::PollDuration,
    mode::{ChoiceMode, DisplayMode},
    options::VoteOptions,
    scope::ParticipantScope,
    winners::winning_options,
};
pub use tally::{selection::extract_selections, store::TallyStore};
