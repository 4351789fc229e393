//! Countdown display task

use std::sync::Arc;
use tracing::{debug, info};

use crate::{commands::responses::timer_line, state::AppState};

/// Print the timer line whenever the running countdown changes
pub async fn countdown_display_task(state: Arc<AppState>) {
    info!("Starting countdown display");
    let mut timer_rx = state.subscribe_timer();

    while timer_rx.changed().await.is_ok() {
        let timer = timer_rx.borrow_and_update().clone();
        if timer.is_active {
            println!("{}", timer_line(&timer));
        }
    }

    debug!("Timer channel closed, display stopped");
}
