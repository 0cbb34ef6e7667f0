//! Input model: tool settings and the pointer state machine (Input Capture).
//!
//! Pointer events arrive in client coordinates. Every move inside the canvas
//! produces a cursor sample for presence, whether or not a stroke is in
//! progress. While drawing, each move also produces a segment from the
//! anchor to the pointer, which is painted onto the local surface *before*
//! the matching `draw` message is handed back for sending, then the anchor
//! advances.
//!
//! Nothing is emitted until the hub has assigned this client an identity;
//! callers pass `None` until then.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::{CursorPayload, Message};

use crate::consts::{DEFAULT_BRUSH_SIZE, DEFAULT_COLOR};
use crate::geom::{Bounds, Point};
use crate::stroke::{DrawingSurface, Segment};

/// Current values of the brush and username controls, read at emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    /// Brush color as a CSS string.
    pub color: String,
    /// Brush width in pixels; also the radius peers draw our cursor with.
    pub size: f64,
    /// Display name; empty means unnamed.
    pub username: String,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR.to_owned(), size: DEFAULT_BRUSH_SIZE, username: String::new() }
    }
}

impl ToolState {
    fn display_name(&self) -> Option<String> {
        let trimmed = self.username.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// Pointer up or off the canvas.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// Canvas-local end of the last segment; the next segment starts here.
        anchor: Point,
    },
}

/// Converts pointer events into local echo and outbound messages.
#[derive(Debug, Clone)]
pub struct InputCapture {
    bounds: Bounds,
    state: InputState,
}

impl InputCapture {
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds, state: InputState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Begin a stroke if the press lands on the canvas.
    pub fn pointer_down(&mut self, client: Point) {
        if self.bounds.contains(client) {
            self.state = InputState::Drawing { anchor: self.bounds.to_local(client) };
        }
    }

    /// Handle a pointer move. Returns the messages to send, in order.
    ///
    /// Moves outside the canvas are not canvas events and are ignored.
    pub fn pointer_move(
        &mut self,
        client: Point,
        identity: Option<&str>,
        tools: &ToolState,
        surface: &mut DrawingSurface,
    ) -> Vec<Message> {
        let Some(id) = identity else {
            return Vec::new();
        };
        if !self.bounds.contains(client) {
            return Vec::new();
        }
        let at = self.bounds.to_local(client);

        let mut out = vec![Message::Cursor(CursorPayload {
            id: id.to_owned(),
            x: at.x,
            y: at.y,
            color: tools.color.clone(),
            size: tools.size,
            username: tools.display_name(),
        })];

        if let InputState::Drawing { anchor } = self.state {
            let segment = Segment { from: anchor, to: at, color: tools.color.clone(), width: tools.size };
            surface.apply_segment(&segment);
            out.push(Message::Draw(segment.to_draw()));
            self.state = InputState::Drawing { anchor: at };
        }
        out
    }

    /// End the stroke.
    pub fn pointer_up(&mut self) {
        self.state = InputState::Idle;
    }

    /// End the stroke and tell peers to stop drawing our cursor.
    pub fn pointer_leave(&mut self, identity: Option<&str>) -> Vec<Message> {
        self.state = InputState::Idle;
        identity
            .map(|id| vec![Message::CursorRemove { id: id.to_owned() }])
            .unwrap_or_default()
    }

    /// Clear control: wipe the local surface, then broadcast the clear.
    pub fn clear_action(identity: Option<&str>, surface: &mut DrawingSurface) -> Vec<Message> {
        surface.clear();
        if identity.is_none() {
            return Vec::new();
        }
        vec![Message::Clear]
    }

    /// Username control: remember the new name and announce it.
    pub fn change_username(name: &str, identity: Option<&str>, tools: &mut ToolState) -> Vec<Message> {
        tools.username = name.to_owned();
        if identity.is_none() {
            return Vec::new();
        }
        vec![Message::ChangeUsername { name: name.to_owned() }]
    }
}
