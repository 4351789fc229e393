//! State management module
//! 
//! This module contains the timer snapshot type and the application state
//! that owns every component.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{format_time, Phase, TimerState, BREAK_MINUTES, WORK_MINUTES};
