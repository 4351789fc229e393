//! Console command module
//!
//! One command per input line, parsed with clap and applied to the
//! application state by the handlers.

pub mod handlers;
pub mod responses;

use clap::{CommandFactory, Parser, Subcommand};

pub use handlers::handle_command;
pub use responses::{Reply, StatusResponse};

/// A single console input line
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true, disable_help_subcommand = true)]
#[command(override_usage = "<command> [args]")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start or pause
    Toggle,
    /// Back to an idle work phase
    Reset,
    /// Switch to an idle break phase
    Break,
    /// Set the current phase length in minutes (1-60)
    Duration {
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Show or change the color theme
    Theme { id: Option<String> },
    /// List available themes
    Themes,
    /// Use an audio file as the completion sound
    Upload {
        /// Rest of the line, spaces included
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        path: Vec<String>,
    },
    /// Go back to the default completion sound
    DefaultSound,
    /// Preview the completion sound
    Play,
    /// Show or set the volume (0-100)
    Volume {
        #[arg(allow_hyphen_values = true)]
        percent: Option<String>,
    },
    /// Raise the volume by 10
    VolumeUp,
    /// Lower the volume by 10
    VolumeDown,
    /// Print the full status as JSON
    Status,
    /// Scratch notepad
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
    /// Task notes
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// List the commands
    Help,
    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NoteAction {
    /// Print the notepad
    Show,
    /// Replace the notepad text
    Set {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Empty the notepad
    Clear,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Add a task note
    Add {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Replace the text of a task note
    Edit {
        id: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Delete a task note
    Delete { id: String },
    /// List task notes
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
}

/// Usage text listing every command
pub fn help_text() -> String {
    CommandLine::command().render_help().to_string()
}

/// Parse one console line. Blank lines yield `Ok(None)`; parse failures carry
/// clap's rendered usage message.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    CommandLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.render().to_string())
}
