//! Presentation layer for twitch-tally
//!
//! Console display adapter, operator REPL, and CLI argument definitions.

pub mod cli;
pub mod display;
pub mod repl;

// Re-export commonly used types
pub use cli::Cli;
pub use display::ConsoleDisplay;
pub use repl::{
    OperatorRepl,
    command::{OperatorCommand, ParseError, parse_command},
};
