//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    notify::CompletionNotifier,
    sound::SoundSubsystem,
    storage::{KeyValueStore, TaskNotes},
    theme::ThemeSelector,
    timer::{CompletionHandler, PhaseCompletion, TimerEngine},
};
use super::TimerState;

/// Single owner of the timer, its side effects and the note storage.
///
/// Locks are always taken in the order engine, notifier, sound.
pub struct AppState {
    pub engine: Arc<Mutex<TimerEngine>>,
    pub notifier: Arc<Mutex<CompletionNotifier>>,
    pub sound: Arc<Mutex<SoundSubsystem>>,
    pub theme: Arc<Mutex<ThemeSelector>>,
    pub store: Arc<Mutex<Box<dyn KeyValueStore + Send>>>,
    pub task_notes: Arc<Mutex<TaskNotes>>,
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Timer snapshots for displays
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

/// Routes an engine completion to the notifier, which plays the sound
struct Announce<'a> {
    notifier: &'a mut CompletionNotifier,
    sound: &'a mut SoundSubsystem,
}

impl CompletionHandler for Announce<'_> {
    fn phase_completed(&mut self, completion: &PhaseCompletion) {
        let sound = &mut *self.sound;
        self.notifier.notify(completion, || {
            sound.play();
        });
    }
}

impl AppState {
    pub fn new(
        engine: TimerEngine,
        notifier: CompletionNotifier,
        sound: SoundSubsystem,
        theme: ThemeSelector,
        store: Box<dyn KeyValueStore + Send>,
    ) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(engine.state().clone());
        let task_notes = TaskNotes::load(store.as_ref());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            notifier: Arc::new(Mutex::new(notifier)),
            sound: Arc::new(Mutex::new(sound)),
            theme: Arc::new(Mutex::new(theme)),
            store: Arc::new(Mutex::new(store)),
            task_notes: Arc::new(Mutex::new(task_notes)),
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a user action to the timer engine and publish the new snapshot
    pub fn update_timer<F>(&self, action: &str, updater: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        updater(&mut *engine);
        let new_state = engine.state().clone();
        drop(engine); // Release the lock early

        self.record_action(action);
        self.publish(new_state.clone());
        Ok(new_state)
    }

    /// Deliver one clock tick. Returns the completion if this tick ended a phase.
    pub fn tick(&self) -> Result<Option<PhaseCompletion>, String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
        let mut notifier = self.notifier.lock()
            .map_err(|e| format!("Failed to lock notifier: {}", e))?;
        let mut sound = self.sound.lock()
            .map_err(|e| format!("Failed to lock sound: {}", e))?;

        let completion = engine.tick(&mut Announce {
            notifier: &mut *notifier,
            sound: &mut *sound,
        });
        let new_state = engine.state().clone();
        drop(sound);
        drop(notifier);
        drop(engine);

        self.publish(new_state);
        Ok(completion)
    }

    /// Whether the countdown is running
    pub fn is_timer_active(&self) -> Result<bool, String> {
        self.engine.lock()
            .map(|engine| engine.is_active())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.engine.lock()
            .map(|engine| engine.state().clone())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Run `f` against the sound subsystem, recording `action`
    pub fn with_sound<R>(&self, action: &str, f: impl FnOnce(&mut SoundSubsystem) -> R) -> Result<R, String> {
        let mut sound = self.sound.lock()
            .map_err(|e| format!("Failed to lock sound: {}", e))?;
        let result = f(&mut *sound);
        drop(sound);
        self.record_action(action);
        Ok(result)
    }

    /// Run `f` against the theme selector, recording `action`
    pub fn with_theme<R>(&self, action: &str, f: impl FnOnce(&mut ThemeSelector) -> R) -> Result<R, String> {
        let mut theme = self.theme.lock()
            .map_err(|e| format!("Failed to lock theme: {}", e))?;
        let result = f(&mut *theme);
        drop(theme);
        self.record_action(action);
        Ok(result)
    }

    /// Run `f` against the key-value store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut dyn KeyValueStore) -> R) -> Result<R, String> {
        let mut store = self.store.lock()
            .map_err(|e| format!("Failed to lock store: {}", e))?;
        Ok(f(store.as_mut()))
    }

    /// Run `f` against the task notes together with the store they persist to
    pub fn with_task_notes<R>(
        &self,
        f: impl FnOnce(&mut TaskNotes, &mut dyn KeyValueStore) -> R,
    ) -> Result<R, String> {
        let mut notes = self.task_notes.lock()
            .map_err(|e| format!("Failed to lock task notes: {}", e))?;
        let mut store = self.store.lock()
            .map_err(|e| format!("Failed to lock store: {}", e))?;
        Ok(f(&mut *notes, store.as_mut()))
    }

    /// Number of completions the notifier has announced
    pub fn notifications_fired(&self) -> Result<u64, String> {
        self.notifier.lock()
            .map(|notifier| notifier.fired())
            .map_err(|e| format!("Failed to lock notifier: {}", e))
    }

    /// Let the notifier drop toasts past their auto-close time
    pub fn dismiss_expired_toasts(&self) {
        match self.notifier.lock() {
            Ok(mut notifier) => notifier.dismiss_expired(Utc::now()),
            Err(e) => warn!("Failed to lock notifier: {}", e),
        }
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        info!("Action: {}", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, state: TimerState) {
        self.timer_update_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
