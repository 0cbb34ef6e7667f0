//! JSON-lines UI event source.
//!
//! Each non-blank line is one object tagged by `kind`:
//!
//! ```text
//! {"kind":"down","x":10,"y":10}
//! {"kind":"move","x":40,"y":12}
//! {"kind":"up"}
//! {"kind":"wait","ms":250}
//! ```
//!
//! `wait` is consumed by the reader and paces the events after it. Lines
//! starting with `#` are comments. Malformed lines are logged and skipped.

use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script `{path}`: {source}")]
    Open { path: String, source: std::io::Error },
    #[error("failed to read script line: {0}")]
    Read(#[from] std::io::Error),
}

/// One scripted user action. Coordinates are client-space.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    Color { value: String },
    Size { value: f64 },
    Username { name: String },
    Clear,
    Wait { ms: u64 },
}

/// Parse one line; `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str) -> Result<Option<UiEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Read `input` (`-` for stdin) on a background task. The receiver closes at EOF.
pub fn spawn_script_reader(input: String) -> mpsc::UnboundedReceiver<UiEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let result = if input == "-" {
            read_script(BufReader::new(tokio::io::stdin()), &tx).await
        } else {
            match tokio::fs::File::open(&input).await {
                Ok(file) => read_script(BufReader::new(file), &tx).await,
                Err(source) => Err(ScriptError::Open { path: input.clone(), source }),
            }
        };
        match result {
            Ok(count) => tracing::info!(%input, events = count, "script finished"),
            Err(e) => tracing::error!(error = %e, "script aborted"),
        }
    });
    rx
}

/// Forward parsed events until EOF or until the receiver is dropped.
/// Returns the number of events forwarded.
pub async fn read_script<R>(reader: R, tx: &mpsc::UnboundedSender<UiEvent>) -> Result<usize, ScriptError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0_usize;
    let mut forwarded = 0_usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let event = match parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping malformed script line");
                continue;
            }
        };

        if let UiEvent::Wait { ms } = event {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            continue;
        }
        if tx.send(event).is_err() {
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
