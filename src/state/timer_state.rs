//! Timer state structure and phase definitions

use serde::{Deserialize, Serialize};

/// Canonical length of a work phase in minutes
pub const WORK_MINUTES: u32 = 25;
/// Canonical length of a break phase in minutes
pub const BREAK_MINUTES: u32 = 5;

/// One half of a Pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// Canonical duration used on automatic phase transitions
    pub fn canonical_minutes(self) -> u32 {
        match self {
            Phase::Work => WORK_MINUTES,
            Phase::Break => BREAK_MINUTES,
        }
    }

    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Working",
            Phase::Break => "On break",
        }
    }
}

/// Snapshot of the countdown for the current phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub is_active: bool,
    pub is_break_phase: bool,
    /// Guards against handling the same zero-crossing twice
    pub has_fired_completion: bool,
}

impl TimerState {
    /// Create an idle work-phase timer with the canonical duration
    pub fn new() -> Self {
        Self::idle(Phase::Work, WORK_MINUTES * 60)
    }

    /// Create an idle timer for the given phase and duration
    pub fn idle(phase: Phase, total_seconds: u32) -> Self {
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
            is_active: false,
            is_break_phase: phase == Phase::Break,
            has_fired_completion: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_break_phase {
            Phase::Break
        } else {
            Phase::Work
        }
    }

    /// Remaining time as `MM:SS`
    pub fn formatted(&self) -> String {
        format_time(self.remaining_seconds)
    }

    /// Fraction of the phase still remaining, 1.0 at the start and 0.0 at the end
    pub fn progress(&self) -> f32 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f32 / self.total_seconds as f32
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format seconds as `MM:SS`; minutes are not wrapped into hours
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_work() {
        let state = TimerState::new();
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.total_seconds, 1500);
        assert!(!state.is_active);
        assert_eq!(state.phase(), Phase::Work);
        assert!(!state.has_fired_completion);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(299), "04:59");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn progress_tracks_remaining_fraction() {
        let mut state = TimerState::idle(Phase::Break, 300);
        assert_eq!(state.progress(), 1.0);
        state.remaining_seconds = 150;
        assert_eq!(state.progress(), 0.5);
    }

    #[test]
    fn phase_cycle() {
        assert_eq!(Phase::Work.next(), Phase::Break);
        assert_eq!(Phase::Break.next(), Phase::Work);
        assert_eq!(Phase::Work.canonical_minutes(), 25);
        assert_eq!(Phase::Break.canonical_minutes(), 5);
    }
}
