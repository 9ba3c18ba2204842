//! Table and panel formatting for polls
//!
//! Pure line builders shared by the console display's modes. Winner
//! highlighting follows the tally rules: every option whose count equals
//! the maximum is a winner, and a maximum of zero highlights nothing.

use colored::Colorize;
use tally_domain::{VoteOptions, winning_options};

/// Render seconds as `MMm SSs` above one minute, `NNs` otherwise
pub fn format_hms(seconds: u64) -> String {
    if seconds > 60 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// The live table for chat display mode
pub fn live_table_lines(options: &VoteOptions, counts: &[usize], remaining_secs: u64) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        "Vote Now!".yellow().bold(),
        format!("({} left)", format_hms(remaining_secs)).yellow()
    ));
    lines.push(" #  Option    Votes".yellow().to_string());

    for (number, label) in options.numbered() {
        let count = counts.get(number - 1).copied().unwrap_or(0);
        lines.push(format!(
            "{} {}    {}",
            format!("{number:>2}.").cyan(),
            label.white(),
            count.to_string().green()
        ));
    }
    lines
}

/// The results table shown when a poll ends
pub fn results_lines(options: &VoteOptions, counts: &[usize]) -> Vec<String> {
    let winners = winning_options(counts);

    let mut lines = Vec::new();
    lines.push("==== VOTE RESULTS ====".yellow().bold().to_string());
    lines.push(" #  Option    Votes".yellow().to_string());

    for (number, label) in options.numbered() {
        let count = counts.get(number - 1).copied().unwrap_or(0);
        let line = if winners.contains(&number) {
            format!(
                "{} {}    {}",
                format!("{number:>2}.").magenta().bold(),
                label.magenta().bold(),
                count.to_string().yellow().bold()
            )
        } else {
            format!(
                "{} {}    {}",
                format!("{number:>2}.").cyan(),
                label.white(),
                count.to_string().green()
            )
        };
        lines.push(line);
    }

    lines.push("======================".yellow().bold().to_string());
    lines
}

/// The scoreboard panel for push-rendered display mode.
///
/// Above ten options the panel switches to a compact two-per-line layout
/// so it stays readable.
pub fn scoreboard_lines(options: &VoteOptions, counts: &[usize], remaining_secs: u64) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("== TWITCH VOTE ==".yellow().bold().to_string());
    lines.push(format!(
        "{} {}",
        "Time remaining:".yellow(),
        highlight_time(remaining_secs)
    ));
    lines.push("Type a number in Twitch chat to vote".yellow().to_string());
    lines.push("--------------------".dimmed().to_string());

    if options.count() <= 10 {
        for (number, label) in options.numbered() {
            let count = counts.get(number - 1).copied().unwrap_or(0);
            lines.push(format!(
                "{} {} {}",
                format!("{number}.").cyan(),
                label.white(),
                format!("[{count}]").green()
            ));
        }
    } else {
        let entries: Vec<String> = options
            .numbered()
            .map(|(number, label)| {
                let count = counts.get(number - 1).copied().unwrap_or(0);
                format!("{number}.{label} [{count}]")
            })
            .collect();
        for pair in entries.chunks(2) {
            lines.push(pair.join(" | ").cyan().to_string());
        }
    }
    lines
}

/// Single status line for in-place countdown updates
pub fn status_line(remaining_secs: u64, total_votes: usize) -> String {
    format!(
        "{} {}  {} {}",
        "Time remaining:".yellow(),
        highlight_time(remaining_secs),
        "| votes:".dimmed(),
        total_votes
    )
}

/// The time turns red in the final ten seconds
fn highlight_time(remaining_secs: u64) -> String {
    let text = format_hms(remaining_secs);
    if remaining_secs <= 10 {
        text.red().to_string()
    } else {
        text.white().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> VoteOptions {
        VoteOptions::try_new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(45), "45s");
        assert_eq!(format_hms(60), "60s");
        assert_eq!(format_hms(90), "1m 30s");
        assert_eq!(format_hms(3600), "60m 0s");
    }

    #[test]
    fn test_live_table_contains_every_option_and_count() {
        let lines = live_table_lines(&options(&["red", "blue"]), &[3, 1], 42);
        let joined = lines.join("\n");
        assert!(joined.contains("red"));
        assert!(joined.contains("blue"));
        assert!(joined.contains('3'));
        assert!(joined.contains("42s"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_results_highlight_all_tied_winners() {
        colored::control::set_override(true);
        let lines = results_lines(&options(&["alpha", "beta", "gamma"]), &[2, 2, 1]);
        // tied winners render in the highlight style, the loser does not
        assert!(lines[2].contains(&"alpha".magenta().bold().to_string()));
        assert!(lines[3].contains(&"beta".magenta().bold().to_string()));
        assert!(lines[4].contains(&"gamma".white().to_string()));
        colored::control::unset_override();
    }

    #[test]
    fn test_results_with_no_votes_highlight_nothing() {
        colored::control::set_override(true);
        let lines = results_lines(&options(&["alpha", "beta"]), &[0, 0]);
        assert!(lines[2].contains(&"alpha".white().to_string()));
        assert!(lines[3].contains(&"beta".white().to_string()));
        colored::control::unset_override();
    }

    #[test]
    fn test_scoreboard_compact_layout_above_ten_options() {
        let labels: Vec<String> = (1..=12).map(|i| format!("opt{i}")).collect();
        let options = VoteOptions::try_new(labels).unwrap();
        let counts = vec![0; 12];

        let lines = scoreboard_lines(&options, &counts, 30);
        let option_lines: Vec<&String> =
            lines.iter().filter(|l| l.contains("opt")).collect();
        // 12 options pack into 6 lines of two
        assert_eq!(option_lines.len(), 6);
        assert!(option_lines[0].contains('|'));
    }

    #[test]
    fn test_status_line_mentions_votes() {
        let line = status_line(15, 7);
        assert!(line.contains('7'));
        assert!(line.contains("15s"));
    }
}
