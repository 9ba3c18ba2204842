//! Console display adapter
//!
//! Implements [`PollDisplay`] for a terminal audience. Scoreboard mode
//! keeps a panel plus an in-place countdown line; chat mode prints the
//! table whenever the orchestrator pushes a refresh. All calls arrive
//! from the orchestrator's scheduling domain, so the interior state only
//! needs a plain mutex.

use crate::display::table;
use colored::Colorize;
use std::io::Write;
use std::sync::Mutex;
use tally_application::{ActivePollView, CountsProvider, PollDisplay, PollResultsView};
use tally_domain::{DisplayMode, Participant, ParticipantScope};

enum Shown {
    None,
    Live(LiveView),
    Results,
}

struct LiveView {
    counts: CountsProvider,
    mode: DisplayMode,
}

/// Terminal renderer for polls.
pub struct ConsoleDisplay {
    shown: Mutex<Shown>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            shown: Mutex::new(Shown::None),
        }
    }

    fn print_lines(lines: &[String]) {
        println!();
        for line in lines {
            println!("{line}");
        }
    }

    fn announce(poll: &ActivePollView<'_>) {
        println!();
        println!("{}", "A vote has started! Use Twitch chat to vote.".yellow());
        println!(
            "{}",
            format!("Vote in Twitch chat: twitch.tv/{}", poll.channel).yellow()
        );
        println!(
            "{} {}",
            "Vote mode:".yellow(),
            poll.choice_mode.describe().yellow().bold()
        );
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl PollDisplay for ConsoleDisplay {
    fn show_active_poll(&self, poll: &ActivePollView<'_>) {
        let Ok(mut shown) = self.shown.lock() else {
            return;
        };
        let first_render = !matches!(*shown, Shown::Live(_));
        if first_render {
            Self::announce(poll);
        }

        let counts = (poll.counts)();
        let lines = match poll.display_mode {
            DisplayMode::Scoreboard => {
                table::scoreboard_lines(poll.options, &counts, poll.remaining_secs)
            }
            DisplayMode::Chat => table::live_table_lines(poll.options, &counts, poll.remaining_secs),
        };
        Self::print_lines(&lines);

        *shown = Shown::Live(LiveView {
            counts: poll.counts.clone(),
            mode: poll.display_mode,
        });
    }

    fn update_remaining_time(&self, _viewer: &Participant, seconds: u64) {
        let Ok(shown) = self.shown.lock() else {
            return;
        };
        let Shown::Live(view) = &*shown else {
            return;
        };

        // The chat table carries its own time header and is refreshed on
        // its own cadence; only the scoreboard ticks in place
        if view.mode == DisplayMode::Scoreboard {
            let total: usize = (view.counts)().iter().sum();
            print!("\r{}\u{1b}[K", table::status_line(seconds, total));
            let _ = std::io::stdout().flush();
        }
    }

    fn show_results(&self, results: &PollResultsView<'_>) {
        let Ok(mut shown) = self.shown.lock() else {
            return;
        };
        println!();
        Self::print_lines(&table::results_lines(results.options, results.counts));
        println!("{}", "The vote has ended! Results are displayed.".yellow().bold());
        *shown = Shown::Results;
    }

    fn hide_all(&self) {
        let Ok(mut shown) = self.shown.lock() else {
            return;
        };
        if matches!(*shown, Shown::Results) {
            println!();
            println!("{}", "The vote has ended.".yellow());
        }
        *shown = Shown::None;
    }

    fn hide_for(&self, _viewer: &Participant) {
        // One shared terminal: hiding for the only viewer hides the lot
        self.hide_all();
    }

    fn audience(&self, _scope: &ParticipantScope) -> Vec<Participant> {
        vec![Participant::new("console")]
    }
}
