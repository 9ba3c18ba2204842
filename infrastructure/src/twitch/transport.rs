//! Twitch chat transport adapter.
//!
//! Implements [`ChatTransport`] over a plain TCP IRC connection with a
//! line codec. A background reader task parses incoming frames, answers
//! keepalives, and forwards channel messages into the session's sink;
//! cancelling its token is how `close` (and `Drop`) release the
//! connection.

use crate::twitch::protocol::{self, IrcEvent};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tally_application::ports::chat_transport::{
    ChatConnection, ChatTransport, MessageSink, TransportError,
};
use tally_domain::{ChannelName, ChatMessage, Participant};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::codec::{Framed, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Production Twitch chat endpoint
pub const DEFAULT_CHAT_SERVER: &str = "irc.chat.twitch.tv:6667";

/// Oversized chat lines are cut off rather than buffering without bound
const MAX_LINE_LEN: usize = 8192;

type ChatFramed = Framed<TcpStream, LinesCodec>;
type SharedWriter = Arc<Mutex<SplitSink<ChatFramed, String>>>;

/// Anonymous Twitch chat transport.
pub struct TwitchChatTransport {
    server: String,
}

impl TwitchChatTransport {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
        }
    }
}

impl Default for TwitchChatTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_SERVER)
    }
}

#[async_trait]
impl ChatTransport for TwitchChatTransport {
    async fn connect(
        &self,
        channel: &ChannelName,
        sink: MessageSink,
    ) -> Result<Box<dyn ChatConnection>, TransportError> {
        let stream = TcpStream::connect(&self.server)
            .await
            .map_err(|e| TransportError::ConnectFailed(format!("{}: {e}", self.server)))?;
        let framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LEN));
        let (mut writer, reader) = framed.split();

        // justinfan guest login: read-only, no credentials involved
        writer
            .send(protocol::nick(&protocol::anonymous_nick()))
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        writer
            .send(protocol::join(channel.as_str()))
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        let writer: SharedWriter = Arc::new(Mutex::new(writer));
        let token = CancellationToken::new();
        let reader_task = tokio::spawn(read_loop(
            reader,
            Arc::clone(&writer),
            sink,
            channel.clone(),
            token.clone(),
        ));

        Ok(Box::new(TwitchConnection {
            channel: channel.clone(),
            writer,
            token,
            reader: Some(reader_task),
        }))
    }
}

/// One open connection to a Twitch channel.
struct TwitchConnection {
    channel: ChannelName,
    writer: SharedWriter,
    token: CancellationToken,
    reader: Option<JoinHandle<()>>,
}

#[async_trait]
impl ChatConnection for TwitchConnection {
    async fn leave(&mut self) -> Result<(), TransportError> {
        self.writer
            .lock()
            .await
            .send(protocol::part(self.channel.as_str()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.token.cancel();
        if let Some(reader) = self.reader.take() {
            let _ = reader.await;
        }
        self.writer
            .lock()
            .await
            .close()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

impl Drop for TwitchConnection {
    fn drop(&mut self) {
        // The reader must not outlive the handle, even when close() was
        // never reached
        self.token.cancel();
    }
}

async fn read_loop(
    mut reader: SplitStream<ChatFramed>,
    writer: SharedWriter,
    sink: MessageSink,
    channel: ChannelName,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            frame = reader.next() => match frame {
                Some(Ok(line)) => handle_line(&line, &writer, &sink, &channel).await,
                Some(Err(e)) => warn!("chat read error: {e}"),
                None => {
                    debug!("chat stream ended by server");
                    break;
                }
            }
        }
    }
}

async fn handle_line(line: &str, writer: &SharedWriter, sink: &MessageSink, channel: &ChannelName) {
    match protocol::parse_line(line) {
        IrcEvent::Ping { token } => {
            if let Err(e) = writer.lock().await.send(protocol::pong(&token)).await {
                warn!("failed to answer chat keepalive: {e}");
            }
        }
        IrcEvent::Privmsg {
            nick,
            channel: target,
            text,
        } => {
            if target != channel.as_str() {
                return;
            }
            match Participant::try_new(nick) {
                Ok(participant) => sink(ChatMessage::new(participant, text)),
                Err(_) => debug!("dropping chat message with empty sender"),
            }
        }
        IrcEvent::Other => {}
    }
}
