//! CSS hex color parsing for the raster layers.
//!
//! Colors travel on the wire as whatever string the sender's color picker
//! produced. Only hex forms are understood; anything else renders as opaque
//! black so a bad peer cannot make strokes vanish.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// An 8-bit-per-channel color, non-premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent; the value of a cleared pixel.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
#[must_use]
pub fn parse_hex(raw: &str) -> Option<Rgba> {
    let hex = raw.trim().strip_prefix('#')?;
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let Ok(value) = u32::from_str_radix(hex, 16) else {
        return None;
    };

    #[allow(clippy::cast_possible_truncation)]
    let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 17;
    #[allow(clippy::cast_possible_truncation)]
    let byte = |shift: u32| ((value >> shift) & 0xff) as u8;

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(8), nibble(4), nibble(0))),
        4 => Some(Rgba { r: nibble(12), g: nibble(8), b: nibble(4), a: nibble(0) }),
        6 => Some(Rgba::rgb(byte(16), byte(8), byte(0))),
        8 => Some(Rgba { r: byte(24), g: byte(16), b: byte(8), a: byte(0) }),
        _ => None,
    }
}

/// Resolve a wire color for painting, falling back to opaque black.
#[must_use]
pub fn resolve(raw: &str) -> Rgba {
    parse_hex(raw).unwrap_or_else(|| {
        tracing::debug!(color = raw, "unparseable color; painting black");
        Rgba::BLACK
    })
}
