//! Console response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    sound::SoundSelection,
    state::{Phase, TimerState},
    theme::{PaletteStyle, ThemeId},
};

/// What the console should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Print a message
    Message(String),
    /// Nothing to print
    Silent,
    /// Stop reading input
    Quit,
}

impl Reply {
    pub fn message(text: impl Into<String>) -> Self {
        Reply::Message(text.into())
    }
}

/// Full status snapshot printed by `status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub remaining: String,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub progress: f32,
    pub theme: ThemeId,
    pub palette: PaletteStyle,
    pub sound: SoundSelection,
    pub notifications_fired: u64,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// One-line summary of the timer, e.g. `24:59  Working  [running]`
pub fn timer_line(state: &TimerState) -> String {
    format!(
        "{}  {}  [{}]",
        state.formatted(),
        state.phase().label(),
        if state.is_active { "running" } else { "paused" }
    )
}
