//! Channel name value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A chat channel identity (Value Object)
///
/// Twitch channel names are case-insensitive; the name is lowercased at
/// construction so joins, message filtering, and logging all agree on one
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelName(String);

impl ChannelName {
    /// Try to create a new channel name
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let name = name.trim().trim_start_matches('#');
        if name.is_empty() {
            return Err(DomainError::EmptyChannelName);
        }
        Ok(Self(name.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
