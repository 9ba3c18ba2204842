//! Cancellable handle set for scheduled work
//!
//! Every timer and worker task the orchestrator spawns for a poll is
//! tracked here, so teardown is one loop over one collection instead of a
//! scatter of nullable fields that can be forgotten individually.

use tokio::task::AbortHandle;

/// Tracks the abort handles of all scheduled tasks for the current poll.
pub(crate) struct TimerSet {
    handles: Vec<AbortHandle>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Track a newly spawned task.
    ///
    /// Handles of tasks that already ran to completion are pruned here,
    /// keeping the set bounded across many polls.
    pub fn track(&mut self, handle: AbortHandle) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Abort every tracked task.
    ///
    /// Safe to call with handles that already fired or were already
    /// cancelled — aborting a finished task is a no-op.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
