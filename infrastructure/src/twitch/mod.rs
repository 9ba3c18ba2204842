//! Twitch chat transport
//!
//! Anonymous IRC connection to Twitch chat: no account is needed to read
//! a channel, so the transport logs in with a `justinfan` guest nick and
//! only ever reads `PRIVMSG` frames.

pub mod protocol;
pub mod transport;

pub use transport::{DEFAULT_CHAT_SERVER, TwitchChatTransport};
