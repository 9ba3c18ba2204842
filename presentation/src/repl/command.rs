//! Operator command grammar
//!
//! Pure parsing of REPL lines into commands. Range validation of the
//! duration and option count belongs to the engine; the parser only
//! checks shape.

use thiserror::Error;

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Start {
        seconds: u64,
        channel: String,
        options: Vec<String>,
    },
    Stop,
    Reload,
    ToggleDisplayMode,
    ToggleChoiceMode,
    Status,
    Help,
    Quit,
}

/// Errors produced while parsing an operator line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("usage: start <seconds> <channel> <option1> <option2> ...")]
    StartUsage,

    #[error("invalid number for seconds: {0}")]
    InvalidSeconds(String),

    #[error("you must provide at least two voting options")]
    TooFewOptions,

    #[error("unknown command: {0} (type 'help')")]
    Unknown(String),
}

/// Parse one non-empty operator line.
pub fn parse_command(line: &str) -> Result<OperatorCommand, ParseError> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next().unwrap_or_default().to_lowercase();

    match head.as_str() {
        "start" => {
            let seconds_token = tokens.next().ok_or(ParseError::StartUsage)?;
            let seconds = seconds_token
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidSeconds(seconds_token.to_string()))?;
            let channel = tokens.next().ok_or(ParseError::StartUsage)?.to_string();
            let options: Vec<String> = tokens.map(str::to_string).collect();
            if options.len() < 2 {
                return Err(ParseError::TooFewOptions);
            }
            Ok(OperatorCommand::Start {
                seconds,
                channel,
                options,
            })
        }
        "stop" => Ok(OperatorCommand::Stop),
        "reload" => Ok(OperatorCommand::Reload),
        "toggle-display-mode" | "togglemode" => Ok(OperatorCommand::ToggleDisplayMode),
        "toggle-choice-mode" | "togglevote" => Ok(OperatorCommand::ToggleChoiceMode),
        "status" => Ok(OperatorCommand::Status),
        "help" | "?" => Ok(OperatorCommand::Help),
        "quit" | "exit" => Ok(OperatorCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
