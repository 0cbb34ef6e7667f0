//! WebSocket task that keeps the client attached to the hub.
//!
//! The task owns the socket. It forwards every inbound text message to the
//! session as [`NetEvent::Text`], writes whatever the session queues on the
//! outbound channel, and reports each lifecycle change as
//! [`NetEvent::Status`]. When the channel drops it waits out the
//! [`Backoff`] delay and dials again.
//!
//! ERROR HANDLING
//! ==============
//! Connect and transport failures are logged and end the current attempt;
//! they never end the task. The task stops only when the session side goes
//! away (outbound sender dropped or event receiver closed).

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use super::backoff::Backoff;
use super::{ConnectionStatus, NetEvent};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket transport failed: {0}")]
    Transport(Box<tokio_tungstenite::tungstenite::Error>),
}

/// Session-side ends of the socket task.
pub struct SyncHandle {
    /// Encoded messages to send. Anything queued while disconnected is dropped.
    pub outbound: mpsc::UnboundedSender<String>,
    pub events: mpsc::UnboundedReceiver<NetEvent>,
    pub task: JoinHandle<()>,
}

/// How one connection attempt ended.
#[derive(Debug, PartialEq, Eq)]
enum Ended {
    /// The hub closed the socket; try again.
    Remote,
    /// The session is gone; stop for good.
    Shutdown,
}

/// Spawn the connection task on the current runtime.
pub fn spawn_sync_client(url: String, backoff: Backoff) -> SyncHandle {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(sync_loop(url, backoff, outbound_rx, events_tx));
    SyncHandle { outbound: outbound_tx, events: events_rx, task }
}

async fn sync_loop(
    url: String,
    mut backoff: Backoff,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<NetEvent>,
) {
    loop {
        if events.send(NetEvent::Status(ConnectionStatus::Connecting)).is_err() {
            return;
        }

        match connect_and_run(&url, &mut backoff, &mut outbound, &events).await {
            Ok(Ended::Shutdown) => {
                tracing::debug!("session closed; stopping sync client");
                return;
            }
            Ok(Ended::Remote) => tracing::info!("hub closed the connection"),
            Err(e) => tracing::warn!(error = %e, "hub connection failed"),
        }

        if events.send(NetEvent::Status(ConnectionStatus::Disconnected)).is_err() {
            return;
        }

        let delay = backoff.next_delay();
        tracing::info!(?delay, "reconnecting after delay");
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = events.closed() => return,
        }
    }
}

async fn connect_and_run(
    url: &str,
    backoff: &mut Backoff,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<NetEvent>,
) -> Result<Ended, SyncError> {
    let (stream, _response) = connect_async(url).await.map_err(|e| SyncError::Connect(Box::new(e)))?;
    backoff.reset();

    let stale = discard_queued(outbound);
    if stale > 0 {
        tracing::debug!(count = stale, "dropped messages queued while disconnected");
    }

    tracing::info!(%url, "connected to hub");
    if events.send(NetEvent::Status(ConnectionStatus::Connected)).is_err() {
        return Ok(Ended::Shutdown);
    }

    let (mut write, mut read) = stream.split();
    loop {
        tokio::select! {
            queued = outbound.recv() => {
                let Some(text) = queued else {
                    close_gracefully(&mut write, outbound).await;
                    return Ok(Ended::Shutdown);
                };
                write.send(WsMessage::Text(text.into())).await.map_err(|e| SyncError::Transport(Box::new(e)))?;
            }
            inbound = read.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => {
                    if events.send(NetEvent::Text(text.as_str().to_owned())).is_err() {
                        close_gracefully(&mut write, outbound).await;
                        return Ok(Ended::Shutdown);
                    }
                }
                Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => {
                        if events.send(NetEvent::Text(text)).is_err() {
                            close_gracefully(&mut write, outbound).await;
                            return Ok(Ended::Shutdown);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "discarding non-UTF-8 binary message"),
                },
                Some(Ok(WsMessage::Close(_))) | None => return Ok(Ended::Remote),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(SyncError::Transport(Box::new(e))),
            },
        }
    }
}

/// Send whatever the session queued before it went away, then run the
/// close handshake. Failures only end the flush early.
async fn close_gracefully<S>(write: &mut S, outbound: &mut mpsc::UnboundedReceiver<String>)
where
    S: Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let mut flushed = 0_usize;
    while let Ok(text) = outbound.try_recv() {
        if let Err(e) = write.send(WsMessage::Text(text.into())).await {
            tracing::debug!(error = %e, flushed, "flush before close failed");
            return;
        }
        flushed += 1;
    }
    if flushed > 0 {
        tracing::debug!(count = flushed, "flushed queued messages before close");
    }
    if let Err(e) = write.close().await {
        tracing::debug!(error = %e, "close handshake failed");
    }
}

/// Empty the outbound queue without sending; returns how many were dropped.
fn discard_queued(outbound: &mut mpsc::UnboundedReceiver<String>) -> usize {
    let mut dropped = 0;
    while outbound.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

#[cfg(test)]
#[path = "sync_client_test.rs"]
mod tests;
