//! Chat message entity

use crate::chat::participant::Participant;

/// A single chat message attributed to a participant (Entity)
#[derive(Debug, Clone)]
pub struct ChatMessage {
    participant: Participant,
    text: String,
}

impl ChatMessage {
    pub fn new(participant: Participant, text: impl Into<String>) -> Self {
        Self {
            participant,
            text: text.into(),
        }
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
