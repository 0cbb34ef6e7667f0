//! The session loop: one task owns the engine and multiplexes scripted UI
//! events, hub traffic, and the frame clock.

use std::future::Future;
use std::time::Duration;

use canvas::engine::{Effect, EngineCore};
use canvas::geom::Point;
use frames::Message;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::net::{ConnectionStatus, NetEvent};
use crate::script::UiEvent;

pub struct Session {
    engine: EngineCore,
    outbound: mpsc::UnboundedSender<String>,
    status: ConnectionStatus,
}

impl Session {
    pub fn new(engine: EngineCore, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { engine, outbound, status: ConnectionStatus::Disconnected }
    }

    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn into_engine(self) -> EngineCore {
        self.engine
    }

    /// Apply one user action; returns how many messages were queued for the hub.
    pub fn handle_ui(&mut self, event: UiEvent) -> usize {
        let messages = match event {
            UiEvent::Down { x, y } => {
                self.engine.on_pointer_down(Point::new(x, y));
                Vec::new()
            }
            UiEvent::Move { x, y } => self.engine.on_pointer_move(Point::new(x, y)),
            UiEvent::Up => {
                self.engine.on_pointer_up();
                Vec::new()
            }
            UiEvent::Leave => self.engine.on_pointer_leave(),
            UiEvent::Color { value } => {
                self.engine.set_color(&value);
                Vec::new()
            }
            UiEvent::Size { value } => {
                self.engine.set_brush_size(value);
                Vec::new()
            }
            UiEvent::Username { name } => self.engine.set_username(&name),
            UiEvent::Clear => self.engine.on_clear(),
            // Paced by the script reader; nothing to apply here.
            UiEvent::Wait { .. } => Vec::new(),
        };
        self.send_all(&messages)
    }

    pub fn handle_net(&mut self, event: NetEvent, now: std::time::Instant) {
        match event {
            NetEvent::Status(status) => self.set_status(status),
            NetEvent::Text(text) => match self.engine.handle_text(&text, now) {
                Effect::Identity => {
                    tracing::info!(id = self.engine.identity.as_deref().unwrap_or_default(), "joined board");
                }
                Effect::Roster => tracing::info!(users = ?self.engine.roster, "participants updated"),
                Effect::Surface | Effect::Presence | Effect::Ignored => {}
            },
        }
    }

    /// One frame of the render loop.
    pub fn tick(&mut self, now: std::time::Instant) {
        self.engine.render_frame(now);
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if status == self.status {
            return;
        }
        match status {
            ConnectionStatus::Connecting => tracing::info!("connecting to hub"),
            ConnectionStatus::Connected => tracing::info!("connected; waiting for identity"),
            ConnectionStatus::Disconnected => {
                if self.status == ConnectionStatus::Connected {
                    tracing::warn!("connection lost; local edits are not shared until reconnect");
                }
                self.engine.on_disconnect();
            }
        }
        self.status = status;
    }

    fn send_all(&self, messages: &[Message]) -> usize {
        let mut queued = 0;
        for message in messages {
            let text = match frames::encode(message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(tag = message.tag(), error = %e, "dropping unencodable message");
                    continue;
                }
            };
            if self.outbound.send(text).is_err() {
                tracing::debug!(tag = message.tag(), "sync client gone; message dropped");
                continue;
            }
            queued += 1;
        }
        queued
    }
}

/// Timing knobs for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub frame_interval: Duration,
    /// How long to stay after the UI source ends.
    pub linger: Duration,
}

/// Drive `session` until `shutdown` resolves, the sync client stops, or the
/// UI source ends and the linger window passes. Without a UI source the
/// session runs until shutdown.
pub async fn run<F>(
    mut session: Session,
    mut net: mpsc::UnboundedReceiver<NetEvent>,
    mut ui: Option<mpsc::UnboundedReceiver<UiEvent>>,
    options: RunOptions,
    shutdown: F,
) -> Session
where
    F: Future<Output = ()>,
{
    let mut frames = tokio::time::interval(options.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Armed when the UI source ends.
    let linger = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(linger);
    let mut lingering = false;

    tokio::pin!(shutdown);
    session.engine.frame_loop.start();

    loop {
        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
            () = &mut linger, if lingering => {
                tracing::info!("input finished; closing session");
                break;
            }
            event = net.recv() => match event {
                Some(event) => session.handle_net(event, std::time::Instant::now()),
                None => {
                    tracing::warn!("sync client stopped");
                    break;
                }
            },
            event = next_ui(&mut ui), if ui.is_some() => match event {
                Some(event) => {
                    session.handle_ui(event);
                }
                None => {
                    ui = None;
                    lingering = true;
                    linger.as_mut().reset(Instant::now() + options.linger);
                }
            },
            _ = frames.tick() => session.tick(std::time::Instant::now()),
        }
    }

    session.engine.frame_loop.stop();
    session
}

async fn next_ui(ui: &mut Option<mpsc::UnboundedReceiver<UiEvent>>) -> Option<UiEvent> {
    match ui {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
