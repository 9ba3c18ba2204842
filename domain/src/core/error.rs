//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("poll duration must be between {min} and {max} seconds, got {got}")]
    InvalidDuration { got: u64, min: u64, max: u64 },

    #[error("a poll needs between {min} and {max} options, got {got}")]
    InvalidOptionCount { got: usize, min: usize, max: usize },

    #[error("option {0} has an empty label")]
    EmptyOptionLabel(usize),

    #[error("channel name cannot be empty")]
    EmptyChannelName,

    #[error("participant handle cannot be empty")]
    EmptyParticipant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_duration_display() {
        let error = DomainError::InvalidDuration {
            got: 2,
            min: 5,
            max: 3600,
        };
        assert_eq!(
            error.to_string(),
            "poll duration must be between 5 and 3600 seconds, got 2"
        );
    }

    #[test]
    fn test_empty_label_display() {
        let error = DomainError::EmptyOptionLabel(3);
        assert_eq!(error.to_string(), "option 3 has an empty label");
    }
}
