use std::time::{Duration, Instant};

use frames::Message;

use crate::consts::{DEFAULT_CURSOR_TTL_MS, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::geom::{Bounds, Point};
use crate::input::{InputCapture, ToolState};
use crate::overlay::{CursorOverlay, FrameLoop};
use crate::presence::{CursorState, PresenceStore};
use crate::stroke::{DrawingSurface, Segment};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What an inbound message changed, for the host to log or react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The hub assigned (or reassigned) the local identity.
    Identity,
    /// The drawing surface changed.
    Surface,
    /// The presence store changed.
    Presence,
    /// The roster was replaced.
    Roster,
    /// Nothing changed.
    Ignored,
}

/// Construction parameters for [`EngineCore`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    /// Where the canvas sits in client space.
    pub bounds: Bounds,
    /// Presence liveness window; `None` keeps cursors until removed.
    pub cursor_ttl: Option<Duration>,
    pub tools: ToolState,
}

/// Presence liveness window from a millisecond count; 0 disables expiry.
#[must_use]
pub fn cursor_ttl_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
            bounds: Bounds::at_origin(f64::from(DEFAULT_SURFACE_WIDTH), f64::from(DEFAULT_SURFACE_HEIGHT)),
            cursor_ttl: cursor_ttl_from_ms(DEFAULT_CURSOR_TTL_MS),
            tools: ToolState::default(),
        }
    }
}

/// Client state and routing, independent of any transport.
///
/// One instance lives for the whole session. Every mutation goes through
/// `&mut self`, so the single-owner rule replaces locking: the host calls
/// into it from one task only.
pub struct EngineCore {
    /// Identity assigned by the hub; `None` until `init` arrives.
    pub identity: Option<String>,
    pub surface: DrawingSurface,
    pub presence: PresenceStore,
    pub overlay: CursorOverlay,
    pub frame_loop: FrameLoop,
    pub input: InputCapture,
    pub tools: ToolState,
    /// Display names from the most recent `users_update`, in hub order.
    pub roster: Vec<String>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            identity: None,
            surface: DrawingSurface::new(config.width, config.height),
            presence: PresenceStore::with_ttl(config.cursor_ttl),
            overlay: CursorOverlay::new(config.width, config.height),
            frame_loop: FrameLoop::new(),
            input: InputCapture::new(config.bounds),
            tools: config.tools,
            roster: Vec::new(),
        }
    }

    // --- Network inputs ---

    /// Decode and apply one inbound text message. Malformed payloads are
    /// logged and dropped; they never interrupt the stream.
    pub fn handle_text(&mut self, text: &str, now: Instant) -> Effect {
        match frames::decode(text) {
            Ok(message) => self.apply(message, now),
            Err(error) => {
                tracing::warn!(%error, len = text.len(), "discarding malformed message");
                Effect::Ignored
            }
        }
    }

    /// Route one decoded inbound message.
    pub fn apply(&mut self, message: Message, now: Instant) -> Effect {
        match message {
            Message::Init { id } => {
                tracing::info!(%id, "identity assigned");
                self.identity = Some(id);
                Effect::Identity
            }
            Message::Clear => {
                self.surface.clear();
                Effect::Surface
            }
            Message::Draw(draw) => {
                self.surface.apply_segment(&Segment::from_draw(&draw));
                Effect::Surface
            }
            Message::Cursor(cursor) => {
                if self.is_self(&cursor.id) {
                    return Effect::Ignored;
                }
                let state = CursorState::from(&cursor);
                self.presence.upsert(cursor.id, state, now);
                Effect::Presence
            }
            Message::CursorRemove { id } => {
                if !self.is_self(&id) && self.presence.remove(&id) {
                    Effect::Presence
                } else {
                    Effect::Ignored
                }
            }
            Message::UsersUpdate { users } => {
                self.roster = users;
                Effect::Roster
            }
            Message::ChangeUsername { .. } | Message::Unknown => {
                tracing::debug!(tag = message.tag(), "ignoring message");
                Effect::Ignored
            }
        }
    }

    /// The channel dropped: forget the identity so nothing is emitted until
    /// the next `init`, abandon any stroke, and drop presence from the old
    /// connection. The surface is wiped too; the hub replays its full event
    /// log to every new connection, so strokes come back on rejoin and
    /// clears sent while offline are honored.
    pub fn on_disconnect(&mut self) {
        self.identity = None;
        self.input.pointer_up();
        self.presence.clear();
        self.surface.clear();
    }

    // --- Local inputs ---

    pub fn on_pointer_down(&mut self, client: Point) {
        self.input.pointer_down(client);
    }

    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Message> {
        self.input
            .pointer_move(client, self.identity.as_deref(), &self.tools, &mut self.surface)
    }

    pub fn on_pointer_up(&mut self) {
        self.input.pointer_up();
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Message> {
        self.input.pointer_leave(self.identity.as_deref())
    }

    pub fn on_clear(&mut self) -> Vec<Message> {
        InputCapture::clear_action(self.identity.as_deref(), &mut self.surface)
    }

    pub fn set_username(&mut self, name: &str) -> Vec<Message> {
        InputCapture::change_username(name, self.identity.as_deref(), &mut self.tools)
    }

    pub fn set_color(&mut self, color: &str) {
        self.tools.color = color.to_owned();
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.tools.size = size;
    }

    // --- Render ---

    /// One refresh tick: expire stale presence and redraw the cursor overlay.
    /// Returns whether a frame was drawn (false while the loop is stopped).
    pub fn render_frame(&mut self, now: Instant) -> bool {
        if !self.frame_loop.tick() {
            return false;
        }
        for id in self.presence.expire(now) {
            tracing::debug!(%id, "cursor expired");
        }
        let snapshot = self.presence.snapshot();
        self.overlay.render(&snapshot, self.identity.as_deref());
        true
    }

    // --- Queries ---

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.identity.is_some()
    }

    fn is_self(&self, id: &str) -> bool {
        self.identity.as_deref() == Some(id)
    }
}
