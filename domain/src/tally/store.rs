//! Thread-safe per-participant vote record

use crate::chat::participant::Participant;
use crate::poll::mode::ChoiceMode;
use dashmap::DashMap;
use std::collections::HashSet;

/// Concurrent mapping from participant to selected option numbers.
///
/// Writers (the chat ingestion path) and readers (snapshot computation)
/// may run concurrently; the sharded map locks per entry, so iteration is
/// consistent per participant and eventually consistent across
/// participants. A vote arriving mid-snapshot may or may not be counted,
/// but counts are never corrupted.
///
/// Invariant: every stored number lies in `[1, option_count]` — anything
/// else is silently dropped at recording time, since malformed chat input
/// is expected.
pub struct TallyStore {
    option_count: usize,
    votes: DashMap<Participant, HashSet<usize>>,
}

impl TallyStore {
    /// Create an empty store for a poll with `option_count` options
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count,
            votes: DashMap::new(),
        }
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    /// Record one selection for a participant.
    ///
    /// Numbers outside `[1, option_count]` are ignored without error. In
    /// [`ChoiceMode::Single`] the participant's prior selections are
    /// cleared before the new one is added, so only the most recent valid
    /// number persists. In [`ChoiceMode::Multi`] the number joins the
    /// participant's set; duplicates are no-ops.
    pub fn record_selection(&self, participant: &Participant, number: usize, mode: ChoiceMode) {
        if !(1..=self.option_count).contains(&number) {
            return;
        }

        let mut selections = self.votes.entry(participant.clone()).or_default();
        if mode.is_single() {
            selections.clear();
        }
        selections.insert(number);
    }

    /// Point-in-time count of participants per option.
    ///
    /// Index `i` holds the count for option `i + 1`.
    pub fn snapshot_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.option_count];
        for entry in self.votes.iter() {
            for &number in entry.value() {
                if (1..=self.option_count).contains(&number) {
                    counts[number - 1] += 1;
                }
            }
        }
        counts
    }

    /// Remove all participant entries
    pub fn clear(&self) {
        self.votes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Number of participants with at least one recorded selection
    pub fn participant_count(&self) -> usize {
        self.votes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Participant {
        Participant::new("ann")
    }

    fn bob() -> Participant {
        Participant::new("bob")
    }

    #[test]
    fn test_multi_choice_selections_accumulate() {
        let store = TallyStore::new(3);
        store.record_selection(&ann(), 1, ChoiceMode::Multi);
        store.record_selection(&ann(), 3, ChoiceMode::Multi);
        assert_eq!(store.snapshot_counts(), vec![1, 0, 1]);
    }

    #[test]
    fn test_single_choice_keeps_only_latest() {
        let store = TallyStore::new(3);
        store.record_selection(&bob(), 2, ChoiceMode::Single);
        store.record_selection(&bob(), 3, ChoiceMode::Single);
        assert_eq!(store.snapshot_counts(), vec![0, 0, 1]);
    }

    #[test]
    fn test_single_choice_invalid_number_keeps_prior_selection() {
        // "2" then "5" with 3 options: the invalid 5 is dropped before it
        // can clear anything, so 2 persists
        let store = TallyStore::new(3);
        store.record_selection(&bob(), 2, ChoiceMode::Single);
        store.record_selection(&bob(), 5, ChoiceMode::Single);
        assert_eq!(store.snapshot_counts(), vec![0, 1, 0]);
    }

    #[test]
    fn test_out_of_range_never_affects_counts() {
        let store = TallyStore::new(3);
        store.record_selection(&ann(), 0, ChoiceMode::Multi);
        store.record_selection(&ann(), 4, ChoiceMode::Multi);
        store.record_selection(&ann(), usize::MAX, ChoiceMode::Multi);
        assert_eq!(store.snapshot_counts(), vec![0, 0, 0]);
    }

    #[test]
    fn test_duplicate_votes_count_once() {
        let store = TallyStore::new(2);
        store.record_selection(&ann(), 1, ChoiceMode::Multi);
        store.record_selection(&ann(), 1, ChoiceMode::Multi);
        assert_eq!(store.snapshot_counts(), vec![1, 0]);
    }

    #[test]
    fn test_counts_bounded_by_distinct_participants() {
        let store = TallyStore::new(2);
        for i in 0..10 {
            let p = Participant::new(format!("viewer{i}"));
            store.record_selection(&p, 1, ChoiceMode::Multi);
            store.record_selection(&p, 1, ChoiceMode::Multi);
        }
        assert_eq!(store.snapshot_counts(), vec![10, 0]);
        assert_eq!(store.participant_count(), 10);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = TallyStore::new(2);
        store.record_selection(&ann(), 1, ChoiceMode::Multi);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.snapshot_counts(), vec![0, 0]);
    }

    #[test]
    fn test_concurrent_writers_do_not_corrupt_counts() {
        use std::sync::Arc;

        let store = Arc::new(TallyStore::new(4));
        let mut handles = Vec::new();
        for t in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let p = Participant::new(format!("t{t}-viewer{i}"));
                    store.record_selection(&p, (i % 4) + 1, ChoiceMode::Multi);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.snapshot_counts(), vec![100, 100, 100, 100]);
    }
}
