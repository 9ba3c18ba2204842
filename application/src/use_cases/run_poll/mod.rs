//! Run Poll use case
//!
//! Orchestrates the full lifecycle of a poll: single-flight occupancy,
//! the connect handshake off the scheduling domain, countdown and refresh
//! cadence, the one-and-only stop routine, and total cleanup of scheduled
//! work on every transition.
//!
//! All orchestrator state is owned by a single event loop (the scheduling
//! domain). Operator commands arrive over an mpsc channel with a oneshot
//! reply; timers are spawned tasks that post events back into the loop
//! and live in a [`TimerSet`] so teardown can never miss one.

mod session;
mod state;
mod timers;

pub use session::VoteSession;
pub use state::{
    InterruptedPoll, OrchestratorError, PollPhase, PollStatus, ReloadOutcome, StartPollRequest,
};

use crate::config::PollSettings;
use crate::ports::chat_transport::ChatTransport;
use crate::ports::config_source::ConfigSource;
use crate::ports::poll_archive::{PollArchive, PollRecord};
use crate::ports::poll_display::{ActivePollView, CountsProvider, PollDisplay, PollResultsView};
use state::{LivePoll, PollState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tally_domain::{ChannelName, ChoiceMode, DisplayMode, PollDuration, VoteOptions};
use timers::TimerSet;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Chat-mode table refreshes stop in the final stretch so the results
/// table is not interleaved with a stale live view.
const CHAT_REFRESH_CUTOFF_SECS: u64 = 5;

enum Event {
    Command(Command),
    ConnectFinished,
    CountdownTick,
    RefreshTick,
    AutoStopElapsed,
    ResultsExpired,
}

enum Command {
    Start(StartPollRequest, oneshot::Sender<Result<(), OrchestratorError>>),
    Stop(oneshot::Sender<Result<(), OrchestratorError>>),
    Reload(oneshot::Sender<Result<ReloadOutcome, OrchestratorError>>),
    ToggleDisplayMode(oneshot::Sender<DisplayMode>),
    ToggleChoiceMode(oneshot::Sender<ChoiceMode>),
    Status(oneshot::Sender<PollStatus>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle for issuing operator commands to a running
/// orchestrator.
///
/// Every method resolves once the event loop has fully committed the
/// transition, so a caller that observes "no poll" can immediately start
/// a fresh one.
#[derive(Clone)]
pub struct OrchestratorHandle {
    events: mpsc::UnboundedSender<Event>,
}

impl OrchestratorHandle {
    pub async fn start_poll(&self, request: StartPollRequest) -> Result<(), OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Start(request, reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)?
    }

    pub async fn stop_poll(&self) -> Result<(), OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Stop(reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)?
    }

    pub async fn reload(&self) -> Result<ReloadOutcome, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Reload(reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)?
    }

    pub async fn toggle_display_mode(&self) -> Result<DisplayMode, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::ToggleDisplayMode(reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)
    }

    pub async fn toggle_choice_mode(&self) -> Result<ChoiceMode, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::ToggleChoiceMode(reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)
    }

    pub async fn status(&self) -> Result<PollStatus, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Status(reply))?;
        response.await.map_err(|_| OrchestratorError::ShutDown)
    }

    /// Stop any live poll, cancel all scheduled work, and end the event
    /// loop. Resolves only after teardown is committed.
    pub async fn shutdown(&self) {
        let (reply, response) = oneshot::channel();
        if self.send(Command::Shutdown(reply)).is_ok() {
            let _ = response.await;
        }
    }

    fn send(&self, command: Command) -> Result<(), OrchestratorError> {
        self.events
            .send(Event::Command(command))
            .map_err(|_| OrchestratorError::ShutDown)
    }
}

/// Owns at most one [`VoteSession`] and every timer scheduled for it.
pub struct SessionOrchestrator {
    transport: Arc<dyn ChatTransport>,
    display: Arc<dyn PollDisplay>,
    config: Arc<dyn ConfigSource>,
    archive: Arc<dyn PollArchive>,
    settings: PollSettings,
    /// Shared with each session's ingestion handler so choice-mode
    /// toggles apply to votes already in flight.
    single_choice: Arc<AtomicBool>,
    state: PollState,
    poll: Option<LivePoll>,
    timers: TimerSet,
    events_tx: mpsc::UnboundedSender<Event>,
}

impl SessionOrchestrator {
    /// Spawn the orchestrator event loop.
    ///
    /// Returns the command handle and the loop's join handle; the loop
    /// runs until [`OrchestratorHandle::shutdown`] is called or every
    /// handle is dropped.
    pub fn spawn(
        transport: Arc<dyn ChatTransport>,
        display: Arc<dyn PollDisplay>,
        config: Arc<dyn ConfigSource>,
        archive: Arc<dyn PollArchive>,
        settings: PollSettings,
    ) -> (OrchestratorHandle, JoinHandle<()>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let single_choice = Arc::new(AtomicBool::new(settings.choice_mode.is_single()));

        let orchestrator = Self {
            transport,
            display,
            config,
            archive,
            settings,
            single_choice,
            state: PollState::Idle,
            poll: None,
            timers: TimerSet::new(),
            events_tx: events_tx.clone(),
        };

        let join = tokio::spawn(orchestrator.run(events_rx));
        (OrchestratorHandle { events: events_tx }, join)
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            match event {
                Event::Command(Command::Start(request, reply)) => {
                    let _ = reply.send(self.handle_start(request));
                }
                Event::Command(Command::Stop(reply)) => {
                    let result = self.handle_stop().await;
                    let _ = reply.send(result);
                }
                Event::Command(Command::Reload(reply)) => {
                    let result = self.handle_reload().await;
                    let _ = reply.send(result);
                }
                Event::Command(Command::ToggleDisplayMode(reply)) => {
                    let _ = reply.send(self.handle_toggle_display_mode());
                }
                Event::Command(Command::ToggleChoiceMode(reply)) => {
                    let _ = reply.send(self.handle_toggle_choice_mode());
                }
                Event::Command(Command::Status(reply)) => {
                    let _ = reply.send(self.status());
                }
                Event::Command(Command::Shutdown(reply)) => {
                    self.shutdown_inline().await;
                    let _ = reply.send(());
                    break;
                }
                Event::ConnectFinished => self.on_connect_finished().await,
                Event::CountdownTick => self.on_countdown_tick().await,
                Event::RefreshTick => self.on_refresh_tick(),
                Event::AutoStopElapsed => self.on_auto_stop_elapsed().await,
                Event::ResultsExpired => self.on_results_expired(),
            }
        }
        debug!("poll orchestrator event loop exited");
    }

    fn handle_start(&mut self, request: StartPollRequest) -> Result<(), OrchestratorError> {
        if self.state != PollState::Idle {
            return Err(OrchestratorError::PollAlreadyRunning);
        }

        let duration = PollDuration::try_new(request.duration_secs)?;
        let options = VoteOptions::try_new(request.options)?;
        let channel = ChannelName::try_new(request.channel)?;

        // A stale results-expiry timer from the previous poll must not
        // fire into this one
        self.timers.cancel_all();

        let session = Arc::new(VoteSession::new(
            Arc::clone(&self.transport),
            channel.clone(),
            options.count(),
            Arc::clone(&self.single_choice),
        ));
        self.poll = Some(LivePoll {
            session: Arc::clone(&session),
            options,
            channel: channel.clone(),
            scope: request.scope,
            total_secs: duration.as_secs(),
            remaining_secs: duration.as_secs(),
        });
        self.state = PollState::Connecting {
            stop_requested: false,
        };
        info!("starting poll in channel {} for {}", channel, duration);

        // The handshake may block on network I/O, so it runs on a worker
        // and reports back as an event; the loop never waits on it
        let events = self.events_tx.clone();
        let connector = tokio::spawn(async move {
            session.start().await;
            let _ = events.send(Event::ConnectFinished);
        });
        self.timers.track(connector.abort_handle());

        Ok(())
    }

    async fn handle_stop(&mut self) -> Result<(), OrchestratorError> {
        match self.state {
            PollState::Idle => Err(OrchestratorError::NoActivePoll),
            PollState::Connecting { .. } => {
                // Teardown is deferred to the connect worker's completion
                // so the handshake result cannot leak
                self.state = PollState::Connecting {
                    stop_requested: true,
                };
                info!("stop requested while connecting; poll will end as soon as the handshake settles");
                Ok(())
            }
            PollState::Active => {
                self.finish_poll().await;
                Ok(())
            }
            PollState::Stopping => Ok(()),
        }
    }

    async fn handle_reload(&mut self) -> Result<ReloadOutcome, OrchestratorError> {
        let interrupted = self.poll.as_ref().map(|poll| InterruptedPoll {
            channel: poll.channel.clone(),
            remaining_secs: poll.remaining_secs,
        });

        match self.state {
            PollState::Idle => {}
            PollState::Connecting { .. } => {
                self.state = PollState::Connecting {
                    stop_requested: true,
                };
            }
            _ => self.finish_poll().await,
        }

        let settings = self.config.load().await?;
        self.apply_settings(settings);
        info!("configuration reloaded");

        Ok(ReloadOutcome { interrupted })
    }

    fn handle_toggle_display_mode(&mut self) -> DisplayMode {
        self.settings.display_mode = self.settings.display_mode.toggle();
        let mode = self.settings.display_mode;
        info!("display mode set to {}", mode);

        if self.state == PollState::Active
            && let Some(poll) = self.poll.as_ref()
        {
            // Old widgets come down, the current snapshot goes back up in
            // the new mode; countdown and auto-stop timers are untouched
            self.display.hide_all();
            self.display.show_active_poll(&self.active_view(poll));
        }
        mode
    }

    fn handle_toggle_choice_mode(&mut self) -> ChoiceMode {
        self.settings.choice_mode = self.settings.choice_mode.toggle();
        let mode = self.settings.choice_mode;
        self.single_choice.store(mode.is_single(), Ordering::SeqCst);
        info!("choice mode set to {}", mode);

        if self.state == PollState::Active
            && let Some(poll) = self.poll.as_ref()
        {
            self.display.show_active_poll(&self.active_view(poll));
        }
        mode
    }

    fn status(&self) -> PollStatus {
        PollStatus {
            phase: self.state.phase(),
            channel: self.poll.as_ref().map(|poll| poll.channel.clone()),
            remaining_secs: self.poll.as_ref().map(|poll| poll.remaining_secs),
            display_mode: self.settings.display_mode,
            choice_mode: self.settings.choice_mode,
        }
    }

    async fn on_connect_finished(&mut self) {
        match self.state {
            PollState::Connecting {
                stop_requested: true,
            } => {
                debug!("connect settled after stop request; tearing down");
                self.finish_poll().await;
            }
            PollState::Connecting {
                stop_requested: false,
            } => {
                let Some(total_secs) = self.poll.as_ref().map(|poll| poll.total_secs) else {
                    self.state = PollState::Idle;
                    return;
                };
                self.state = PollState::Active;
                if let Some(poll) = self.poll.as_ref() {
                    self.display.show_active_poll(&self.active_view(poll));
                    info!("poll live in channel {} ({}s)", poll.channel, total_secs);
                }
                self.arm_poll_timers(total_secs);
            }
            _ => debug!("ignoring connect completion in phase {}", self.state.phase()),
        }
    }

    async fn on_countdown_tick(&mut self) {
        if self.state != PollState::Active {
            return;
        }
        let Some(poll) = self.poll.as_mut() else {
            return;
        };
        poll.remaining_secs = poll.remaining_secs.saturating_sub(1);
        let remaining = poll.remaining_secs;
        let scope = poll.scope.clone();

        for viewer in self.display.audience(&scope) {
            self.display.update_remaining_time(&viewer, remaining);
        }

        if remaining == 0 {
            self.finish_poll().await;
        }
    }

    fn on_refresh_tick(&self) {
        if self.state != PollState::Active || self.settings.display_mode != DisplayMode::Chat {
            return;
        }
        let Some(poll) = self.poll.as_ref() else {
            return;
        };
        if poll.remaining_secs <= CHAT_REFRESH_CUTOFF_SECS {
            return;
        }
        self.display.show_active_poll(&self.active_view(poll));
    }

    async fn on_auto_stop_elapsed(&mut self) {
        if self.state == PollState::Active {
            self.finish_poll().await;
        }
    }

    fn on_results_expired(&self) {
        if self.state != PollState::Idle {
            return;
        }
        self.display.hide_all();
        debug!("results display expired");
    }

    /// The one and only stop routine, shared by the operator command, the
    /// countdown reaching zero, the auto-stop timer, reload, and the
    /// deferred stop-while-connecting path. The `Stopping` guard makes it
    /// run at most once per poll.
    async fn finish_poll(&mut self) {
        if self.state == PollState::Stopping {
            return;
        }
        let Some(poll) = self.poll.as_ref() else {
            self.state = PollState::Idle;
            return;
        };
        self.state = PollState::Stopping;

        // Final counts come from the still-live session: a vote landing
        // during the disconnect is at worst reflected here, never read
        // from an already-cleared store
        let final_counts = poll.session.vote_counts();
        poll.session.stop().await;
        self.timers.cancel_all();

        self.display.show_results(&PollResultsView {
            options: &poll.options,
            counts: &final_counts,
            scope: &poll.scope,
            display_mode: self.settings.display_mode,
        });
        self.archive.record(PollRecord::new(
            &poll.channel,
            &poll.options,
            &final_counts,
            poll.total_secs,
        ));
        info!(
            "poll in channel {} ended with counts {:?}",
            poll.channel, final_counts
        );

        let events = self.events_tx.clone();
        let delay = self.settings.results_display;
        let expiry = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::ResultsExpired);
        });
        self.timers.track(expiry.abort_handle());

        // Only now does the poll read as absent: teardown is committed
        self.poll = None;
        self.state = PollState::Idle;
    }

    /// Inline teardown for process shutdown. Never schedules further
    /// work; the scheduler itself may be going away.
    async fn shutdown_inline(&mut self) {
        info!("shutting down poll orchestrator");
        if let Some(poll) = self.poll.take() {
            poll.session.stop().await;
        }
        self.timers.cancel_all();
        self.display.hide_all();
        self.state = PollState::Idle;
    }

    fn arm_poll_timers(&mut self, total_secs: u64) {
        let events = self.events_tx.clone();
        let countdown = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if events.send(Event::CountdownTick).is_err() {
                    break;
                }
            }
        });
        self.timers.track(countdown.abort_handle());

        let events = self.events_tx.clone();
        let period = self.settings.refresh_interval;
        let refresh = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if events.send(Event::RefreshTick).is_err() {
                    break;
                }
            }
        });
        self.timers.track(refresh.abort_handle());

        let events = self.events_tx.clone();
        let auto_stop = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(total_secs)).await;
            let _ = events.send(Event::AutoStopElapsed);
        });
        self.timers.track(auto_stop.abort_handle());
    }

    fn active_view<'a>(&self, poll: &'a LivePoll) -> ActivePollView<'a> {
        ActivePollView {
            options: &poll.options,
            counts: Self::counts_provider(&poll.session),
            scope: &poll.scope,
            channel: &poll.channel,
            remaining_secs: poll.remaining_secs,
            display_mode: self.settings.display_mode,
            choice_mode: self.settings.choice_mode,
        }
    }

    fn counts_provider(session: &Arc<VoteSession>) -> CountsProvider {
        let session = Arc::clone(session);
        Arc::new(move || session.vote_counts())
    }

    fn apply_settings(&mut self, settings: PollSettings) {
        self.single_choice
            .store(settings.choice_mode.is_single(), Ordering::SeqCst);
        self.settings = settings;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::ports::chat_transport::{ChatConnection, MessageSink, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tally_domain::{ChatMessage, Participant, ParticipantScope};

    /// Transport double: hands out one mock connection per connect and
    /// keeps the sink so tests can inject chat messages.
    pub(crate) struct MockTransport {
        sink: Mutex<Option<MessageSink>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        fail_connect: bool,
        fail_leave: bool,
        connects: AtomicUsize,
        left: Arc<AtomicBool>,
        closed: Arc<AtomicBool>,
        close_count: Arc<AtomicUsize>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                sink: Mutex::new(None),
                gate: Mutex::new(None),
                fail_connect: false,
                fail_leave: false,
                connects: AtomicUsize::new(0),
                left: Arc::new(AtomicBool::new(false)),
                closed: Arc::new(AtomicBool::new(false)),
                close_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Transport whose connect always fails
        pub fn failing() -> Self {
            Self {
                fail_connect: true,
                ..Self::new()
            }
        }

        pub fn with_failing_leave(mut self) -> Self {
            self.fail_leave = true;
            self
        }

        /// Transport whose connect blocks until the returned sender
        /// fires, for stop-while-connecting races
        pub fn gated() -> (Self, oneshot::Sender<()>) {
            let (release, gate) = oneshot::channel();
            let transport = Self {
                gate: Mutex::new(Some(gate)),
                ..Self::new()
            };
            (transport, release)
        }

        /// Inject a chat message as the transport's delivery context
        /// would
        pub fn deliver(&self, user: &str, text: &str) {
            let sink = self.sink.lock().unwrap().clone();
            if let Some(sink) = sink {
                sink(ChatMessage::new(Participant::new(user), text));
            }
        }

        pub fn connect_count(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        pub fn left(&self) -> bool {
            self.left.load(Ordering::SeqCst)
        }

        pub fn closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }

        pub fn close_count(&self) -> usize {
            self.close_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for MockTransport {
        async fn connect(
            &self,
            _channel: &ChannelName,
            sink: MessageSink,
        ) -> Result<Box<dyn ChatConnection>, TransportError> {
            self.connects.fetch_add(1, Ordering::SeqCst);

            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            if self.fail_connect {
                return Err(TransportError::ConnectFailed("mock connect refused".into()));
            }

            *self.sink.lock().unwrap() = Some(sink);
            Ok(Box::new(MockConnection {
                fail_leave: self.fail_leave,
                left: Arc::clone(&self.left),
                closed: Arc::clone(&self.closed),
                close_count: Arc::clone(&self.close_count),
            }))
        }
    }

    struct MockConnection {
        fail_leave: bool,
        left: Arc<AtomicBool>,
        closed: Arc<AtomicBool>,
        close_count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ChatConnection for MockConnection {
        async fn leave(&mut self) -> Result<(), TransportError> {
            if self.fail_leave {
                return Err(TransportError::SendFailed("mock leave refused".into()));
            }
            self.left.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.closed.store(true, Ordering::SeqCst);
            self.close_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Display double recording every call from the scheduling domain
    pub(crate) struct RecordingDisplay {
        shown: Mutex<Vec<Vec<usize>>>,
        remaining: Mutex<Vec<u64>>,
        results: Mutex<Vec<Vec<usize>>>,
        hides: AtomicUsize,
    }

    impl RecordingDisplay {
        pub fn new() -> Self {
            Self {
                shown: Mutex::new(Vec::new()),
                remaining: Mutex::new(Vec::new()),
                results: Mutex::new(Vec::new()),
                hides: AtomicUsize::new(0),
            }
        }

        pub fn shown_count(&self) -> usize {
            self.shown.lock().unwrap().len()
        }

        pub fn remaining_updates(&self) -> Vec<u64> {
            self.remaining.lock().unwrap().clone()
        }

        pub fn results_shown(&self) -> Vec<Vec<usize>> {
            self.results.lock().unwrap().clone()
        }

        pub fn hide_count(&self) -> usize {
            self.hides.load(Ordering::SeqCst)
        }
    }

    impl PollDisplay for RecordingDisplay {
        fn show_active_poll(&self, poll: &ActivePollView<'_>) {
            self.shown.lock().unwrap().push((poll.counts)());
        }

        fn update_remaining_time(&self, _viewer: &Participant, seconds: u64) {
            self.remaining.lock().unwrap().push(seconds);
        }

        fn show_results(&self, results: &PollResultsView<'_>) {
            self.results.lock().unwrap().push(results.counts.to_vec());
        }

        fn hide_all(&self) {
            self.hides.fetch_add(1, Ordering::SeqCst);
        }

        fn hide_for(&self, _viewer: &Participant) {}

        fn audience(&self, _scope: &ParticipantScope) -> Vec<Participant> {
            vec![Participant::new("viewer")]
        }
    }

    /// Archive double collecting finished poll records
    pub(crate) struct RecordingArchive {
        records: Mutex<Vec<PollRecord>>,
    }

    impl RecordingArchive {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
            }
        }

        pub fn records(&self) -> Vec<PollRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl PollArchive for RecordingArchive {
        fn record(&self, record: PollRecord) {
            self.records.lock().unwrap().push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{MockTransport, RecordingArchive, RecordingDisplay};
    use super::*;
    use crate::ports::config_source::StaticConfigSource;
    use tally_domain::{DomainError, ParticipantScope};

    fn start_request(duration_secs: u64) -> StartPollRequest {
        StartPollRequest {
            duration_secs,
            channel: "streamer".into(),
            options: vec!["red".into(), "green".into(), "blue".into()],
            scope: ParticipantScope::new("main"),
        }
    }

    fn spawn_with(
        transport: Arc<MockTransport>,
        settings: PollSettings,
    ) -> (
        OrchestratorHandle,
        Arc<RecordingDisplay>,
        Arc<RecordingArchive>,
    ) {
        let display = Arc::new(RecordingDisplay::new());
        let archive = Arc::new(RecordingArchive::new());
        let config: Arc<dyn ConfigSource> = Arc::new(StaticConfigSource::new(settings.clone()));
        let display_port: Arc<dyn PollDisplay> = display.clone();
        let archive_port: Arc<dyn PollArchive> = archive.clone();
        let (handle, _join) =
            SessionOrchestrator::spawn(transport, display_port, config, archive_port, settings);
        (handle, display, archive)
    }

    /// Let the event loop drain the connect worker and its completion
    /// event; virtual time barely moves.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_rejected_first_unaffected() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        let err = handle.start_poll(start_request(10)).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::PollAlreadyRunning));

        // The first poll still runs to completion, exactly once
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(display.results_shown().len(), 1);
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_duration_and_options_rejected_without_state_change() {
        let transport = Arc::new(MockTransport::new());
        let (handle, _display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        let err = handle.start_poll(start_request(2)).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidRequest(DomainError::InvalidDuration { .. })
        ));

        let mut request = start_request(10);
        request.options = (0..21).map(|i| format!("o{i}")).collect();
        let err = handle.start_poll(request).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidRequest(DomainError::InvalidOptionCount { .. })
        ));

        // No state was consumed: a valid start is still accepted
        handle.start_poll(start_request(10)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_connect_completes_tears_down_fully() {
        let (transport, release) = MockTransport::gated();
        let transport = Arc::new(transport);
        let (handle, _display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Connecting);

        // Stop accepted while the handshake is still in flight
        handle.stop_poll().await.unwrap();
        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Connecting);

        release.send(()).unwrap();
        settle().await;

        let status = handle.status().await.unwrap();
        assert_eq!(status.phase, PollPhase::Idle);
        assert!(status.channel.is_none());
        assert!(transport.closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expiry_shows_results_exactly_once() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(15)).await;

        assert_eq!(display.results_shown().len(), 1);
        assert_eq!(archive.records().len(), 1);
        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_stop_then_expiry_does_not_duplicate_results() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        settle().await;
        handle.stop_poll().await.unwrap();

        // Both the countdown and the auto-stop would have fired by now
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(display.results_shown().len(), 1);

        let err = handle.stop_poll().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NoActivePoll));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_pushes_remaining_time_to_audience() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(display.remaining_updates(), vec![9, 8, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_counts_snapshot_before_disconnect() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(30)).await.unwrap();
        settle().await;
        transport.deliver("ann", "I vote 1 and 3");

        handle.stop_poll().await.unwrap();

        // The tally is cleared by the session stop, but the results carry
        // the pre-disconnect snapshot
        assert_eq!(display.results_shown(), vec![vec![1, 0, 1]]);
        let records = archive.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].counts, vec![1, 0, 1]);
        assert_eq!(records[0].winners, vec![1, 3]);
        assert!(transport.closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_mode_refresh_repushes_table() {
        let transport = Arc::new(MockTransport::new());
        let settings = PollSettings::default()
            .with_display_mode(DisplayMode::Chat)
            .with_refresh_interval(Duration::from_secs(2));
        let (handle, display, _archive) = spawn_with(Arc::clone(&transport), settings);

        handle.start_poll(start_request(30)).await.unwrap();
        settle().await;
        assert_eq!(display.shown_count(), 1);

        tokio::time::sleep(Duration::from_millis(4500)).await;
        // Initial render plus refreshes at 2s and 4s
        assert_eq!(display.shown_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scoreboard_mode_ignores_refresh_ticks() {
        let transport = Arc::new(MockTransport::new());
        let settings = PollSettings::default().with_refresh_interval(Duration::from_secs(2));
        let (handle, display, _archive) = spawn_with(Arc::clone(&transport), settings);

        handle.start_poll(start_request(30)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(4500)).await;

        assert_eq!(display.shown_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_refresh_suppressed_in_final_stretch() {
        let transport = Arc::new(MockTransport::new());
        let settings = PollSettings::default()
            .with_display_mode(DisplayMode::Chat)
            .with_refresh_interval(Duration::from_secs(2));
        let (handle, display, _archive) = spawn_with(Arc::clone(&transport), settings);

        handle.start_poll(start_request(8)).await.unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(7)).await;

        // Refresh at 2s (6s left) shows; at 4s and 6s the remaining time
        // is inside the cutoff
        assert_eq!(display.shown_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_display_mode_rerenders_without_touching_countdown() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let mode = handle.toggle_display_mode().await.unwrap();
        assert_eq!(mode, DisplayMode::Chat);
        assert_eq!(display.shown_count(), 2);
        assert_eq!(display.hide_count(), 1);

        // The countdown kept its phase: the poll still ends on schedule
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(display.results_shown().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_choice_mode_applies_to_votes_in_flight() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(30)).await.unwrap();
        settle().await;

        transport.deliver("bob", "2");
        let mode = handle.toggle_choice_mode().await.unwrap();
        assert_eq!(mode, ChoiceMode::Single);
        transport.deliver("bob", "3");

        handle.stop_poll().await.unwrap();
        assert_eq!(display.results_shown(), vec![vec![0, 0, 1]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_interrupts_poll_and_reports_remaining_time() {
        let transport = Arc::new(MockTransport::new());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(20)).await.unwrap();
        settle().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let outcome = handle.reload().await.unwrap();
        let interrupted = outcome.interrupted.expect("poll was live");
        assert_eq!(interrupted.remaining_secs, 15);
        assert_eq!(interrupted.channel.as_str(), "streamer");

        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Idle);
        assert_eq!(display.results_shown().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_when_idle_reports_nothing_interrupted() {
        let transport = Arc::new(MockTransport::new());
        let (handle, _display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        let outcome = handle.reload().await.unwrap();
        assert!(outcome.interrupted.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure_poll_still_runs_and_finishes() {
        let transport = Arc::new(MockTransport::failing());
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(12)).await;

        assert_eq!(display.results_shown(), vec![vec![0, 0, 0]]);
        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_when_idle_rejected() {
        let transport = Arc::new(MockTransport::new());
        let (handle, _display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        let err = handle.stop_poll().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NoActivePoll));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_connect_cleans_up() {
        let (transport, _release) = MockTransport::gated();
        let transport = Arc::new(transport);
        let (handle, display, _archive) =
            spawn_with(Arc::clone(&transport), PollSettings::default());

        handle.start_poll(start_request(10)).await.unwrap();
        handle.shutdown().await;

        assert!(display.hide_count() >= 1);
        let err = handle.status().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::ShutDown));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_results_expiry_cannot_hide_next_poll() {
        let transport = Arc::new(MockTransport::new());
        let mut settings = PollSettings::default();
        settings.results_display = Duration::from_secs(5);
        let (handle, display, _archive) = spawn_with(Arc::clone(&transport), settings);

        handle.start_poll(start_request(10)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(display.results_shown().len(), 1);
        let hides_before = display.hide_count();

        // Second poll begins before the first poll's expiry would fire
        handle.start_poll(start_request(30)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(display.hide_count(), hides_before);
        assert_eq!(handle.status().await.unwrap().phase, PollPhase::Active);
    }
}
