//! Stroke segments and the persistent drawing surface (Stroke Renderer).
//!
//! The surface is the only durable record of what has been drawn: segments
//! are composited and then forgotten, there is no vector history to replay.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use frames::DrawPayload;

use crate::color;
use crate::geom::Point;
use crate::raster::Raster;

/// One straight piece of a freehand path, the atomic unit of drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// CSS color string as carried on the wire.
    pub color: String,
    /// Line width in pixels.
    pub width: f64,
}

impl Segment {
    #[must_use]
    pub fn from_draw(draw: &DrawPayload) -> Self {
        Self {
            from: Point::new(draw.last_x, draw.last_y),
            to: Point::new(draw.x, draw.y),
            color: draw.color.clone(),
            width: draw.size,
        }
    }

    #[must_use]
    pub fn to_draw(&self) -> DrawPayload {
        DrawPayload {
            last_x: self.from.x,
            last_y: self.from.y,
            x: self.to.x,
            y: self.to.y,
            color: self.color.clone(),
            size: self.width,
        }
    }
}

/// The shared drawing surface. Both operations are synchronous and applied
/// immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    raster: Raster,
}

impl DrawingSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { raster: Raster::new(width, height) }
    }

    /// Composite one segment with rounded caps and joins.
    pub fn apply_segment(&mut self, segment: &Segment) {
        let paint = color::resolve(&segment.color);
        self.raster.stroke_line(segment.from, segment.to, segment.width, paint);
    }

    /// Wipe the whole surface.
    pub fn clear(&mut self) {
        self.raster.clear();
    }

    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raster.is_blank()
    }
}
