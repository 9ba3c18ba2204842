//! Participant scope value object

use serde::{Deserialize, Serialize};

/// The audience a poll is shown to (Value Object)
///
/// An opaque label identifying where poll widgets and announcements go,
/// e.g. a room, a stage, or the local console. The display collaborator
/// resolves it to concrete viewers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantScope(String);

impl ParticipantScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
