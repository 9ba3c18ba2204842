//! Vote options value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum number of options in a poll
pub const MIN_OPTIONS: usize = 1;
/// Maximum number of options in a poll
pub const MAX_OPTIONS: usize = 20;

/// The ordered option set of one poll (Value Object)
///
/// An ordered sequence of 1..=20 human-readable labels, fixed for the
/// lifetime of a poll. Option *N* is addressed by the 1-based number *N*
/// and stored at index *N - 1*.
///
/// # Example
///
/// ```
/// use tally_domain::VoteOptions;
///
/// let options = VoteOptions::try_new(vec!["red".into(), "blue".into()]).unwrap();
/// assert_eq!(options.count(), 2);
/// assert_eq!(options.label(2), Some("blue"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOptions {
    labels: Vec<String>,
}

impl VoteOptions {
    /// Try to create a new option set
    ///
    /// Rejects option counts outside [1, 20] and empty labels.
    pub fn try_new(labels: Vec<String>) -> Result<Self, DomainError> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&labels.len()) {
            return Err(DomainError::InvalidOptionCount {
                got: labels.len(),
                min: MIN_OPTIONS,
                max: MAX_OPTIONS,
            });
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(DomainError::EmptyOptionLabel(i + 1));
            }
        }
        Ok(Self { labels })
    }

    /// Number of options
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Label of the 1-based option `number`, if in range
    pub fn label(&self, number: usize) -> Option<&str> {
        if (1..=self.labels.len()).contains(&number) {
            Some(self.labels[number - 1].as_str())
        } else {
            None
        }
    }

    /// All labels in option order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate `(1-based number, label)` pairs in option order
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().enumerate().map(|(i, l)| (i + 1, l.as_str()))
    }
}
