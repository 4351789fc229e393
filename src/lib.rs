//! Pomodoro Timer - a terminal Pomodoro timer with themes, sounds and notes
//! 
//! This library provides the timer engine and its side effects: completion
//! notifications, sound playback, theme selection and local note storage.

pub mod commands;
pub mod config;
pub mod notify;
pub mod sound;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod theme;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use timer::{ClockDriver, TimerEngine};
pub use utils::signals::shutdown_signal;
