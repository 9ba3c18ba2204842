//! Poll archive port
//!
//! Fire-and-forget sink for finished poll results. The archive is an
//! append-only record; nothing is ever read back into the engine.

use serde::Serialize;
use tally_domain::{ChannelName, VoteOptions, winning_options};

/// The outcome of one finished poll
#[derive(Debug, Clone, Serialize)]
pub struct PollRecord {
    pub channel: String,
    pub options: Vec<String>,
    pub counts: Vec<usize>,
    /// 1-based numbers of all max-count options; empty when nobody voted
    pub winners: Vec<usize>,
    pub duration_secs: u64,
}

impl PollRecord {
    pub fn new(
        channel: &ChannelName,
        options: &VoteOptions,
        counts: &[usize],
        duration_secs: u64,
    ) -> Self {
        Self {
            channel: channel.to_string(),
            options: options.labels().to_vec(),
            counts: counts.to_vec(),
            winners: winning_options(counts),
            duration_secs,
        }
    }
}

/// Records finished polls
pub trait PollArchive: Send + Sync {
    /// Append one record. Failures are the adapter's to log; the poll
    /// lifecycle never depends on them.
    fn record(&self, record: PollRecord);
}

/// No-op archive for when recording is not configured
pub struct NoArchive;

impl PollArchive for NoArchive {
    fn record(&self, _record: PollRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_computes_winners() {
        let channel = ChannelName::try_new("streamer").unwrap();
        let options = VoteOptions::try_new(vec!["a".into(), "b".into()]).unwrap();
        let record = PollRecord::new(&channel, &options, &[3, 3], 60);
        assert_eq!(record.winners, vec![1, 2]);
        assert_eq!(record.channel, "streamer");
    }
}
