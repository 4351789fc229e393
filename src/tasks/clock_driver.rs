//! Clock sampling background task

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{state::AppState, timer::ClockDriver};

/// Handle to the running clock task. Dropping it stops the task, so no tick
/// can reach the state after teardown.
#[derive(Debug)]
pub struct ClockTask {
    handle: Option<JoinHandle<()>>,
}

impl ClockTask {
    /// Stop sampling and wait until the task has ended
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Clock task failed: {}", e);
                }
            }
        }
        info!("Clock task stopped");
    }
}

impl Drop for ClockTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Start sampling the monotonic clock every `frame` and feeding ticks to the timer
pub fn spawn_clock_driver(state: Arc<AppState>, frame: Duration) -> ClockTask {
    let handle = tokio::spawn(clock_driver_task(state, frame));
    ClockTask { handle: Some(handle) }
}

/// Background task that turns frame samples into timer ticks
pub async fn clock_driver_task(state: Arc<AppState>, frame: Duration) {
    info!("Starting clock task ({}ms frames)", frame.as_millis());

    let origin = Instant::now();
    let mut driver = ClockDriver::new();
    let mut interval = tokio::time::interval(frame);
    // A late frame is just a late sample; never replay missed frames
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let now_ms = origin.elapsed().as_millis() as u64;

        let active = match state.is_timer_active() {
            Ok(active) => active,
            Err(e) => {
                error!("Failed to read timer state: {}", e);
                continue;
            }
        };

        if driver.sample(now_ms, active) {
            match state.tick() {
                Ok(Some(completion)) => debug!("Phase completion #{} delivered", completion.sequence),
                Ok(None) => {}
                Err(e) => error!("Failed to tick timer: {}", e),
            }
        }

        state.dismiss_expired_toasts();
    }
}
