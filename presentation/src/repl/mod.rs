//! Operator REPL
//!
//! Interactive command loop for running polls: parse a line, send the
//! command to the orchestrator, print a human-readable acknowledgment.

pub mod command;

use colored::Colorize;
use command::{OperatorCommand, parse_command};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tally_application::{OrchestratorHandle, PollPhase, StartPollRequest};
use tally_domain::ParticipantScope;

/// Interactive operator loop driving one orchestrator.
pub struct OperatorRepl {
    handle: OrchestratorHandle,
    scope: ParticipantScope,
}

impl OperatorRepl {
    pub fn new(handle: OrchestratorHandle) -> Self {
        Self {
            handle,
            scope: ParticipantScope::new("console"),
        }
    }

    /// Run until `quit` or end-of-input.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = Self::editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("vote".into()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if self.dispatch(line).await {
                        break;
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Err(e) => {
                    eprintln!("Error: {e:?}");
                    break;
                }
            }
        }

        Ok(())
    }

    fn editor() -> Reedline {
        let mut editor = Reedline::create();
        if let Some(data_dir) = dirs::data_dir() {
            let path = data_dir.join("twitch-tally").join("history.txt");
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(200, path) {
                editor = editor.with_history(Box::new(history));
            }
        }
        editor
    }

    fn print_welcome(&self) {
        println!();
        println!("twitch-tally — time-boxed Twitch chat polls");
        println!("Type 'help' for commands.");
        println!();
    }

    /// Handle one line. Returns true if the loop should exit.
    async fn dispatch(&self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().red());
                return false;
            }
        };

        match command {
            OperatorCommand::Quit => {
                println!("Bye!");
                return true;
            }
            OperatorCommand::Help => self.print_help(),
            OperatorCommand::Start {
                seconds,
                channel,
                options,
            } => {
                let request = StartPollRequest {
                    duration_secs: seconds,
                    channel: channel.clone(),
                    options,
                    scope: self.scope.clone(),
                };
                match self.handle.start_poll(request).await {
                    Ok(()) => println!(
                        "{}",
                        format!(
                            "Voting started for {seconds} seconds in Twitch channel: {channel}"
                        )
                        .green()
                    ),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            OperatorCommand::Stop => match self.handle.stop_poll().await {
                Ok(()) => println!("{}", "Voting session stopped.".green()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            OperatorCommand::Reload => match self.handle.reload().await {
                Ok(outcome) => {
                    if let Some(interrupted) = outcome.interrupted {
                        println!(
                            "{}",
                            format!(
                                "The running vote in {} was interrupted with {} remaining.",
                                interrupted.channel,
                                crate::display::table::format_hms(interrupted.remaining_secs)
                            )
                            .yellow()
                        );
                    }
                    println!("{}", "Configuration reloaded successfully.".green());
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            OperatorCommand::ToggleDisplayMode => match self.handle.toggle_display_mode().await {
                Ok(mode) => println!("{}", format!("Display mode set to: {mode}").green()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            OperatorCommand::ToggleChoiceMode => match self.handle.toggle_choice_mode().await {
                Ok(mode) => println!(
                    "{}",
                    format!("Vote mode set to: {mode} ({})", mode.describe()).green()
                ),
                Err(e) => println!("{}", e.to_string().red()),
            },
            OperatorCommand::Status => match self.handle.status().await {
                Ok(status) => {
                    println!("Phase: {}", status.phase);
                    if status.phase != PollPhase::Idle
                        && let Some(channel) = status.channel
                    {
                        println!("Channel: {channel}");
                    }
                    if let Some(remaining) = status.remaining_secs {
                        println!(
                            "Remaining: {}",
                            crate::display::table::format_hms(remaining)
                        );
                    }
                    println!("Display mode: {}", status.display_mode);
                    println!("Vote mode: {}", status.choice_mode);
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
        }
        false
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  start <seconds> <channel> <option1> <option2> ...");
        println!("      Start a poll (5..3600 seconds, up to 20 options)");
        println!("  stop                 Stop the running poll and show results");
        println!("  status               Show the current poll state");
        println!("  toggle-display-mode  Switch between scoreboard and chat display");
        println!("  toggle-choice-mode   Switch between single vote and multiple votes");
        println!("  reload               Reload the configuration");
        println!("  help                 Show this help");
        println!("  quit                 Exit");
        println!();
    }
}
