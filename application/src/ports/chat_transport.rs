//! Chat transport port
//!
//! Defines the interface for the external message source: joining a
//! channel, receiving `(participant, text)` events, and leaving again.
//! No delivery-order or delivery-count guarantees are assumed from this
//! boundary.

use async_trait::async_trait;
use std::sync::Arc;
use tally_domain::{ChannelName, ChatMessage};
use thiserror::Error;

/// Errors that can occur at the chat transport boundary
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to connect to chat: {0}")]
    ConnectFailed(String),

    #[error("chat send failed: {0}")]
    SendFailed(String),

    #[error("chat connection closed")]
    Closed,
}

/// Callback invoked for every incoming chat message.
///
/// Runs on the transport's own delivery context — possibly concurrently
/// with itself — and must never block on the orchestrator's event loop.
pub type MessageSink = Arc<dyn Fn(ChatMessage) + Send + Sync>;

/// Gateway to the external chat network.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Open a connection to `channel` and deliver its messages to `sink`.
    ///
    /// May block on network I/O; callers run it off the scheduling
    /// domain.
    async fn connect(
        &self,
        channel: &ChannelName,
        sink: MessageSink,
    ) -> Result<Box<dyn ChatConnection>, TransportError>;
}

/// An open connection to one chat channel.
///
/// Exclusively owned by the vote session that created it. Dropping the
/// connection must release its resources even when `leave`/`close` were
/// never called or failed.
#[async_trait]
pub trait ChatConnection: Send + Sync {
    /// Leave the channel. Best-effort at teardown call sites.
    async fn leave(&mut self) -> Result<(), TransportError>;

    /// Close the underlying connection. Best-effort at teardown call
    /// sites.
    async fn close(&mut self) -> Result<(), TransportError>;
}
