//! Participant value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A chat participant identity (Value Object)
///
/// Chat handles are case-insensitive, so the name is lowercased at
/// construction and two spellings of the same handle compare equal.
///
/// # Example
///
/// ```
/// use tally_domain::Participant;
///
/// let a = Participant::new("StreamFan42");
/// let b = Participant::new("streamfan42");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant(String);

impl Participant {
    /// Create a new participant, lowercasing the handle
    ///
    /// # Panics
    /// Panics if the handle is empty or only whitespace
    pub fn new(handle: impl Into<String>) -> Self {
        Self::try_new(handle).expect("participant handle cannot be empty")
    }

    /// Try to create a new participant
    pub fn try_new(handle: impl Into<String>) -> Result<Self, DomainError> {
        let handle = handle.into();
        if handle.trim().is_empty() {
            return Err(DomainError::EmptyParticipant);
        }
        Ok(Self(handle.trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
