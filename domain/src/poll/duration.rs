//! Poll duration value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest allowed poll, in seconds
pub const MIN_DURATION_SECS: u64 = 5;
/// Longest allowed poll, in seconds
pub const MAX_DURATION_SECS: u64 = 3600;

/// A validated poll duration in whole seconds (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDuration(u64);

impl PollDuration {
    /// Try to create a duration, rejecting values outside [5, 3600] seconds
    pub fn try_new(seconds: u64) -> Result<Self, DomainError> {
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&seconds) {
            return Err(DomainError::InvalidDuration {
                got: seconds,
                min: MIN_DURATION_SECS,
                max: MAX_DURATION_SECS,
            });
        }
        Ok(Self(seconds))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl std::fmt::Display for PollDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}
