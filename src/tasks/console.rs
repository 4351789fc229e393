//! Console input task

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{handle_command, parse_line, Reply},
    state::AppState,
};

/// Read commands from stdin until `quit` or end of input
pub async fn console_task(state: Arc<AppState>) {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    if let Err(e) = run_console(state, stdin, stdout).await {
        error!("Console failed: {}", e);
    }
}

/// Drive the command loop over any line source and output sink
pub async fn run_console<R, W>(state: Arc<AppState>, input: R, mut output: W) -> Result<(), String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Console ready, type `help` for commands");
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("End of input");
                return Ok(());
            }
            Err(e) => return Err(format!("Failed to read input: {}", e)),
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                write_line(&mut output, usage.trim_end()).await?;
                continue;
            }
        };
        debug!("Console command: {:?}", command);

        match handle_command(&state, command).await {
            Ok(Reply::Message(text)) => write_line(&mut output, &text).await?,
            Ok(Reply::Silent) => {}
            Ok(Reply::Quit) => {
                info!("Quit requested");
                return Ok(());
            }
            Err(e) => {
                warn!("Command failed: {}", e);
                write_line(&mut output, &format!("error: {}", e)).await?;
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), String> {
    output
        .write_all(format!("{}\n", text).as_bytes())
        .await
        .map_err(|e| format!("Failed to write output: {}", e))?;
    output
        .flush()
        .await
        .map_err(|e| format!("Failed to flush output: {}", e))
}
