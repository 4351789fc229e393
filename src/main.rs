//! Pomodoro Timer - a terminal Pomodoro timer with themes, sounds and notes
//! 
//! This is the main entry point for the pomodoro-timer application.

use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

use pomodoro_timer::{
    config::Config,
    notify::{CompletionNotifier, SystemNotifier, TerminalToastSink},
    sound::{RodioPlayer, SoundSubsystem, SpoolClipRegistry},
    state::AppState,
    storage::JsonFileStore,
    tasks::{console_task, countdown_display_task, spawn_clock_driver},
    theme::ThemeSelector,
    timer::TimerEngine,
    utils::shutdown_signal,
};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they do not interleave with console replies
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));

    // A pending stdin read would otherwise hold the runtime open
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("Starting pomodoro-timer v1.0.0");
    info!("Configuration: minutes={}, theme={}, volume={}%",
          config.minutes, config.theme, config.volume);

    let registry = match &config.spool_dir {
        Some(dir) => SpoolClipRegistry::new(dir),
        None => SpoolClipRegistry::in_temp_dir(),
    }
    .map_err(anyhow::Error::msg)?;

    let mut sound = SoundSubsystem::new(Box::new(registry), Box::new(RodioPlayer::open()));
    sound.set_volume(config.volume as i64);

    let notifier = CompletionNotifier::new(Box::new(TerminalToastSink::new()))
        .with_desktop(Box::new(SystemNotifier::new("pomodoro-timer", config.desktop_notify)));

    let store = JsonFileStore::open(&config.store).map_err(anyhow::Error::msg)?;

    // Create application state
    let state = Arc::new(AppState::new(
        TimerEngine::with_minutes(config.minutes),
        notifier,
        sound,
        ThemeSelector::new(config.theme),
        Box::new(store),
    ));

    // Start sampling the clock
    let clock = spawn_clock_driver(Arc::clone(&state), Duration::from_millis(config.frame_ms));

    let display = config.show_countdown.then(|| {
        let display_state = Arc::clone(&state);
        tokio::spawn(async move {
            countdown_display_task(display_state).await;
        })
    });

    info!("Commands: start, pause, toggle, reset, break, duration <min>, theme <id>, themes,");
    info!("          upload <file>, default-sound, play, volume [<pct>], volume-up, volume-down,");
    info!("          status, note show|set|clear, task add|edit|delete|list, help, quit");

    tokio::select! {
        _ = console_task(Arc::clone(&state)) => {}
        result = shutdown_signal() => {
            match result {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => error!("{}", e),
            }
        }
    }

    clock.shutdown().await;
    if let Some(display) = display {
        display.abort();
        let _ = display.await;
    }

    // Last reference: releases uploaded clips and the spool directory
    match Arc::try_unwrap(state) {
        Ok(state) => drop(state),
        Err(_) => warn!("Application state still shared at shutdown"),
    }

    info!("Shutdown complete");
    Ok(())
}
