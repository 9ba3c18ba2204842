//! Poll display port
//!
//! Defines the interface for rendering live polls and results to the
//! audience. Implementations live in the presentation layer and are only
//! ever called from the orchestrator's scheduling domain.

use std::sync::Arc;
use tally_domain::{ChannelName, ChoiceMode, DisplayMode, Participant, ParticipantScope, VoteOptions};

/// Reads a fresh counts snapshot from the live session.
///
/// Handed to the display so push-rendered widgets can show live numbers
/// without the display owning any tally state.
pub type CountsProvider = Arc<dyn Fn() -> Vec<usize> + Send + Sync>;

/// Everything the display needs to render a live poll
pub struct ActivePollView<'a> {
    pub options: &'a VoteOptions,
    pub counts: CountsProvider,
    pub scope: &'a ParticipantScope,
    pub channel: &'a ChannelName,
    pub remaining_secs: u64,
    pub display_mode: DisplayMode,
    pub choice_mode: ChoiceMode,
}

/// Final results of a finished poll
pub struct PollResultsView<'a> {
    pub options: &'a VoteOptions,
    pub counts: &'a [usize],
    pub scope: &'a ParticipantScope,
    pub display_mode: DisplayMode,
}

/// Renders polls to participants
pub trait PollDisplay: Send + Sync {
    /// Show (or re-show, after a mode toggle or refresh tick) the live
    /// poll
    fn show_active_poll(&self, poll: &ActivePollView<'_>);

    /// Push an updated remaining time to one viewer
    fn update_remaining_time(&self, viewer: &Participant, seconds: u64);

    /// Show the final counts of a finished poll
    fn show_results(&self, results: &PollResultsView<'_>);

    /// Tear down every widget for every viewer
    fn hide_all(&self);

    /// Tear down the widgets of a single viewer
    fn hide_for(&self, viewer: &Participant);

    /// The viewers currently addressed by `scope`
    fn audience(&self, scope: &ParticipantScope) -> Vec<Participant>;
}
