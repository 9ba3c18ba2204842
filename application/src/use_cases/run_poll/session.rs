//! Vote session — one poll's connection and tally
//!
//! A [`VoteSession`] owns the chat connection for one poll plus the
//! [`TallyStore`] fed by it. Its lifecycle is deliberately forgiving:
//! `start`/`stop` are idempotent, and every transport failure on the stop
//! path is logged and swallowed so the local state is always released.

use crate::ports::chat_transport::{ChatConnection, ChatTransport, MessageSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tally_domain::{ChannelName, ChatMessage, ChoiceMode, TallyStore, extract_selections};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A running (or stopped) vote collection session for one channel.
pub struct VoteSession {
    transport: Arc<dyn ChatTransport>,
    channel: ChannelName,
    tally: Arc<TallyStore>,
    /// Checked without a lock so `start`/`stop` callers never block on
    /// each other; also gates the ingestion path so late messages after
    /// `stop` are dropped even while the handler is still registered.
    running: Arc<AtomicBool>,
    /// Shared with the orchestrator, which flips it on toggle commands
    /// while ingestion is live.
    single_choice: Arc<AtomicBool>,
    connection: Mutex<Option<Box<dyn ChatConnection>>>,
}

impl VoteSession {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        channel: ChannelName,
        option_count: usize,
        single_choice: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            channel,
            tally: Arc::new(TallyStore::new(option_count)),
            running: Arc::new(AtomicBool::new(false)),
            single_choice,
            connection: Mutex::new(None),
        }
    }

    /// Connect to the channel and begin collecting votes.
    ///
    /// No-op when already running. A connect failure is logged, not
    /// propagated: the session still counts as running so `stop()` stays
    /// symmetric and a later teardown finds nothing to leak.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.transport.connect(&self.channel, self.message_sink()).await {
            Ok(connection) => {
                *self.connection.lock().await = Some(connection);
                info!("connected to chat channel {}", self.channel);
            }
            Err(e) => {
                warn!("failed to join chat channel {}: {}", self.channel, e);
            }
        }
    }

    /// Disconnect and clear the tally.
    ///
    /// No-op when not running. The connection is taken out of its slot
    /// before the first fallible call, so the handle is released no
    /// matter which teardown step fails; a failed `leave` never prevents
    /// the `close` attempt, and a failed `close` never prevents the tally
    /// from clearing.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let connection = self.connection.lock().await.take();
        if let Some(mut connection) = connection {
            if let Err(e) = connection.leave().await {
                warn!("error leaving chat channel {}: {}", self.channel, e);
            }
            if let Err(e) = connection.close().await {
                warn!("error closing chat connection: {}", e);
            }
            info!("disconnected from chat channel {}", self.channel);
        }

        self.tally.clear();
    }

    /// Current per-option counts (index 0 is option 1)
    pub fn vote_counts(&self) -> Vec<usize> {
        self.tally.snapshot_counts()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// Build the ingestion handler.
    ///
    /// Runs on the transport's delivery context: every maximal digit run
    /// in the message is parsed and recorded; out-of-range and malformed
    /// tokens are dropped per token without failing the message.
    fn message_sink(&self) -> MessageSink {
        let tally = Arc::clone(&self.tally);
        let running = Arc::clone(&self.running);
        let single_choice = Arc::clone(&self.single_choice);

        Arc::new(move |message: ChatMessage| {
            if !running.load(Ordering::SeqCst) {
                debug!("dropping chat message received after stop");
                return;
            }

            let mode = if single_choice.load(Ordering::SeqCst) {
                ChoiceMode::Single
            } else {
                ChoiceMode::Multi
            };

            for number in extract_selections(message.text()) {
                tally.record_selection(message.participant(), number, mode);
            }
        })
    }
}
