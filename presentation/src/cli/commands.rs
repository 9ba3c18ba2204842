//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for twitch-tally
#[derive(Parser, Debug)]
#[command(name = "twitch-tally")]
#[command(author, version, about = "Time-boxed Twitch chat polls with live tallies")]
#[command(long_about = r#"
twitch-tally runs crowd-sourced polls over a Twitch chat channel: viewers
vote by typing option numbers into chat, the tally updates live, and the
results are revealed when the countdown expires or the operator stops the
poll.

Start the binary and drive polls from the operator prompt:

  vote> start 60 somestreamer pizza sushi tacos
  vote> stop

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./tally.toml        Project-level config
3. ~/.config/twitch-tally/config.toml   Global config
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Chat server to connect to (host:port)
    #[arg(long, value_name = "HOST:PORT")]
    pub server: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the welcome banner
    #[arg(short, long)]
    pub quiet: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
