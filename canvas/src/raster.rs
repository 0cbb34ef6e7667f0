//! RGBA pixel layers.
//!
//! A [`Raster`] is the only thing the renderers draw into. Compositing is
//! opaque: a covered pixel takes the paint color outright, never a blend with
//! what was there, so painting the same shape twice leaves identical pixels.
//! Coverage is decided per pixel center, which gives line segments rounded
//! caps for free (the covered region is a capsule).
//!
//! Text is not rasterized here. [`Raster::fill_text`] records a positioned
//! [`TextRun`] that presenters draw with whatever font machinery they have.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use crate::color::Rgba;
use crate::geom::Point;

/// A label drawn on a layer, centered horizontally on `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub center: Point,
    pub color: Rgba,
}

/// A fixed-size RGBA pixel layer plus the text runs drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    text: Vec<TextRun>,
}

impl Raster {
    /// Create a fully transparent layer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self { width, height, pixels: vec![Rgba::TRANSPARENT; len], text: Vec::new() }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data, `width * height` entries.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[must_use]
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    /// The pixel at `(x, y)`, or `None` outside the layer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// True when nothing has been drawn since the last clear.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.pixels.iter().all(|p| p.is_transparent())
    }

    /// Number of non-transparent pixels.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// Reset every pixel to transparent and drop all text runs.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
        self.text.clear();
    }

    /// Stroke a straight line of the given width with rounded caps.
    ///
    /// Non-finite endpoints or a non-positive width draw nothing. Widths below
    /// one pixel are widened to a one-pixel hairline.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        if !from.is_finite() || !to.is_finite() || !(width > 0.0 && width.is_finite()) {
            return;
        }
        let radius = (width / 2.0).max(0.5);
        let min = Point::new(from.x.min(to.x) - radius, from.y.min(to.y) - radius);
        let max = Point::new(from.x.max(to.x) + radius, from.y.max(to.y) + radius);
        self.cover(min, max, color, |center| center.distance_to_segment(from, to) <= radius);
    }

    /// Fill a disc of the given radius.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if !center.is_finite() || !(radius > 0.0 && radius.is_finite()) {
            return;
        }
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        self.cover(min, max, color, |p| (p.x - center.x).hypot(p.y - center.y) <= radius);
    }

    /// Record a text label centered horizontally on `center`.
    pub fn fill_text(&mut self, text: &str, center: Point, color: Rgba) {
        if text.is_empty() || !center.is_finite() {
            return;
        }
        self.text.push(TextRun { text: text.to_owned(), center, color });
    }

    /// Flatten `top` over this layer: wherever `top` has paint it wins.
    /// Layers of different sizes are matched over their common area.
    #[must_use]
    pub fn composite(&self, top: &Raster) -> Raster {
        let mut out = self.clone();
        for y in 0..self.height.min(top.height) {
            for x in 0..self.width.min(top.width) {
                let paint = top.pixels[top.index(x, y)];
                if !paint.is_transparent() {
                    let i = out.index(x, y);
                    out.pixels[i] = paint;
                }
            }
        }
        out.text.extend(top.text.iter().cloned());
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Paint every pixel in the clamped box `min..=max` whose center satisfies `covers`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cover(&mut self, min: Point, max: Point, color: Rgba, covers: impl Fn(Point) -> bool) {
        // Fully transparent paint draws nothing; it must not erase.
        if self.width == 0 || self.height == 0 || color.is_transparent() {
            return;
        }
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        if max.x < 0.0 || max.y < 0.0 || min.x > max_x + 1.0 || min.y > max_y + 1.0 {
            return;
        }
        let x0 = min.x.floor().clamp(0.0, max_x) as u32;
        let x1 = max.x.ceil().clamp(0.0, max_x) as u32;
        let y0 = min.y.floor().clamp(0.0, max_y) as u32;
        let y1 = max.y.ceil().clamp(0.0, max_y) as u32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if covers(center) {
                    let i = self.index(x, y);
                    self.pixels[i] = color;
                }
            }
        }
    }
}
