//! Chat identities and messages
//!
//! Value objects for the entities the chat transport delivers: channels,
//! participants, and the messages they send. Identity is taken as given by
//! the transport; both channel and participant names are case-insensitive
//! and canonicalized to lowercase at construction.

pub mod channel;
pub mod message;
pub mod participant;
