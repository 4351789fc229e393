//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::theme::ThemeId;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-timer")]
#[command(about = "A terminal Pomodoro timer with themes, completion sounds and notes")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Length of the first work phase in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(i64).range(1..=60))]
    pub minutes: i64,

    /// Initial completion sound volume (0-100)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// Initial color theme
    #[arg(short, long, default_value = "light")]
    pub theme: ThemeId,

    /// Directory for uploaded clips (defaults to a per-process temp directory)
    #[arg(long)]
    pub spool_dir: Option<PathBuf>,

    /// File holding notes and other key-value data
    #[arg(long, default_value = "pomodoro-notes.json")]
    pub store: PathBuf,

    /// Clock sampling interval in milliseconds
    #[arg(long, default_value = "16", value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: u64,

    /// Allow desktop notifications on phase completion
    #[arg(long)]
    pub desktop_notify: bool,

    /// Print the remaining time every second while running
    #[arg(long)]
    pub show_countdown: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
