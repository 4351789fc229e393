//! Signal handling for graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::info;

/// Wait for a shutdown signal (SIGTERM, SIGINT, SIGHUP) and return its number.
/// SIGHUP arrives when the terminal is closed.
pub async fn shutdown_signal() -> Result<i32, String> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGHUP,
    ])
    .map_err(|e| format!("Failed to create signal handler: {}", e))?;

    match signals.next().await {
        Some(signal) => {
            info!("Received signal: {}", signal);
            Ok(signal)
        }
        None => Err("Signal stream closed".to_string()),
    }
}
