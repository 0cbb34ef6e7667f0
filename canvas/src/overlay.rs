//! Cursor overlay renderer and the frame loop that paces it.
//!
//! The overlay is a separate transient layer redrawn from scratch every
//! frame from a presence snapshot. It runs on the display's schedule, not on
//! message arrival, so bursts or gaps in remote cursor traffic never change
//! the visual frame rate. [`FrameLoop`] is the start/stop switch the host's
//! refresh ticker consults; tests step it by hand.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::collections::BTreeMap;

use crate::color;
use crate::consts::LABEL_GAP_PX;
use crate::geom::Point;
use crate::presence::CursorState;
use crate::raster::Raster;

/// Start/stop control for the per-frame overlay redraw.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// A stopped loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames drawn since creation.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Called on each refresh tick. Returns whether a frame should be drawn.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frames = self.frames.saturating_add(1);
        true
    }
}

/// Draws other participants' cursors onto its own transient layer.
#[derive(Debug, Clone)]
pub struct CursorOverlay {
    layer: Raster,
}

impl CursorOverlay {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { layer: Raster::new(width, height) }
    }

    #[must_use]
    pub fn layer(&self) -> &Raster {
        &self.layer
    }

    /// Redraw the overlay for one frame.
    ///
    /// Every cursor gets a filled circle of radius `size`; a non-empty
    /// display name is drawn centered above the circle unless the entry
    /// belongs to `local_id`.
    pub fn render(&mut self, snapshot: &BTreeMap<String, CursorState>, local_id: Option<&str>) {
        self.layer.clear();
        for (id, cursor) in snapshot {
            let paint = color::resolve(&cursor.color);
            self.layer.fill_circle(cursor.position, cursor.size, paint);

            let is_self = local_id == Some(id.as_str());
            if let Some(name) = cursor.display_name.as_deref().map(str::trim)
                && !name.is_empty()
                && !is_self
            {
                let above = Point::new(
                    cursor.position.x,
                    cursor.position.y - cursor.size.max(0.0) - LABEL_GAP_PX,
                );
                self.layer.fill_text(name, above, paint);
            }
        }
    }
}
