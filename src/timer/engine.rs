//! Work/break countdown state machine

use serde::Serialize;
use tracing::{debug, info};

use crate::state::{Phase, TimerState};

/// Shortest duration accepted from the user, in minutes
pub const MIN_MINUTES: i64 = 1;
/// Longest duration accepted from the user, in minutes
pub const MAX_MINUTES: i64 = 60;

/// Describes one zero-crossing and the phase that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseCompletion {
    pub finished: Phase,
    pub next: Phase,
    pub next_total_seconds: u32,
    /// Number of zero-crossings since the engine was created, starting at 1
    pub sequence: u64,
}

/// Receives phase completions from [`TimerEngine::tick`]
pub trait CompletionHandler {
    fn phase_completed(&mut self, completion: &PhaseCompletion);
}

impl<F> CompletionHandler for F
where
    F: FnMut(&PhaseCompletion),
{
    fn phase_completed(&mut self, completion: &PhaseCompletion) {
        self(completion)
    }
}

/// Owns the countdown of the current phase and cycles between work and break
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    /// Work length chosen with `set_duration` since the last manual phase switch
    preferred_work_minutes: Option<u32>,
    completions: u64,
}

impl TimerEngine {
    /// Create an idle engine in the work phase with the canonical duration
    pub fn new() -> Self {
        Self {
            state: TimerState::new(),
            preferred_work_minutes: None,
            completions: 0,
        }
    }

    /// Create an idle engine whose first work phase lasts `minutes`.
    /// Out-of-range values fall back to the canonical duration.
    pub fn with_minutes(minutes: i64) -> Self {
        let mut engine = Self::new();
        engine.set_duration(minutes);
        engine
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Number of phases completed so far
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn start(&mut self) {
        if !self.state.is_active {
            debug!("Timer started with {}s remaining", self.state.remaining_seconds);
        }
        self.state.is_active = true;
    }

    pub fn pause(&mut self) {
        if self.state.is_active {
            debug!("Timer paused with {}s remaining", self.state.remaining_seconds);
        }
        self.state.is_active = false;
    }

    pub fn toggle(&mut self) {
        if self.state.is_active {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Re-arm the current phase with `minutes`. Values outside 1..=60 are
    /// ignored and `false` is returned.
    pub fn set_duration(&mut self, minutes: i64) -> bool {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            debug!("Ignoring out-of-range duration: {} minutes", minutes);
            return false;
        }

        let minutes = minutes as u32;
        self.arm(minutes * 60);
        if self.state.phase() == Phase::Work {
            self.preferred_work_minutes = Some(minutes);
        }
        true
    }

    /// Manually switch phase. Entering a break arms five minutes; returning to
    /// work arms the user's last chosen work length once, otherwise 25 minutes.
    pub fn set_break_phase(&mut self, is_break: bool) {
        self.state.is_break_phase = is_break;
        let minutes = if is_break {
            Phase::Break.canonical_minutes()
        } else {
            self.preferred_work_minutes
                .take()
                .unwrap_or_else(|| Phase::Work.canonical_minutes())
        };
        self.arm(minutes * 60);
        info!("Switched to {:?} phase ({} min)", self.state.phase(), minutes);
    }

    /// Back to an idle work phase
    pub fn reset(&mut self) {
        self.set_break_phase(false);
    }

    /// Advance the countdown by one second. On the zero-crossing of a running
    /// phase the handler is invoked exactly once and the engine moves to the
    /// next phase, idle, with its canonical duration.
    pub fn tick<H>(&mut self, handler: &mut H) -> Option<PhaseCompletion>
    where
        H: CompletionHandler + ?Sized,
    {
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        debug!("Tick: {}s remaining", self.state.remaining_seconds);

        if self.state.remaining_seconds > 0
            || !self.state.is_active
            || self.state.has_fired_completion
        {
            return None;
        }

        self.state.has_fired_completion = true;
        self.completions += 1;

        let finished = self.state.phase();
        let next = finished.next();
        let completion = PhaseCompletion {
            finished,
            next,
            next_total_seconds: next.canonical_minutes() * 60,
            sequence: self.completions,
        };

        info!("{:?} phase complete (#{}), next: {:?}", finished, completion.sequence, next);
        handler.phase_completed(&completion);

        self.state.is_active = false;
        self.state.is_break_phase = next == Phase::Break;
        self.arm(completion.next_total_seconds);

        Some(completion)
    }

    fn arm(&mut self, total_seconds: u32) {
        self.state.total_seconds = total_seconds;
        self.state.remaining_seconds = total_seconds;
        self.state.is_active = false;
        self.state.has_fired_completion = false;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
