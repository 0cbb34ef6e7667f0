#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in canvas-local pixels, origin at the surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Shortest distance from this point to the segment `a`–`b`.
    #[must_use]
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return (self.x - a.x).hypot(self.y - a.y);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        let px = a.x + t * dx;
        let py = a.y + t * dy;
        (self.x - px).hypot(self.y - py)
    }
}

/// Placement of the canvas inside the client (window) coordinate space.
///
/// Pointer events arrive in client coordinates; everything sent on the wire
/// is relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Bounds of a canvas whose origin coincides with the client origin.
    #[must_use]
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Whether a client-space point falls on the canvas. Left/top edges are
    /// inclusive, right/bottom exclusive.
    #[must_use]
    pub fn contains(&self, client: Point) -> bool {
        client.x >= self.left
            && client.y >= self.top
            && client.x < self.left + self.width
            && client.y < self.top + self.height
    }

    /// Convert a client-space point to canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}
