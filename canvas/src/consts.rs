//! Shared numeric constants for the canvas crate.

// ── Surface ─────────────────────────────────────────────────────

/// Default drawing surface width in pixels.
pub const DEFAULT_SURFACE_WIDTH: u32 = 800;

/// Default drawing surface height in pixels.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 600;

// ── Tools ───────────────────────────────────────────────────────

/// Brush color before the user picks one.
pub const DEFAULT_COLOR: &str = "#000000";

/// Brush width in pixels before the user picks one.
pub const DEFAULT_BRUSH_SIZE: f64 = 5.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Gap in pixels between the top of a cursor marker and its name label.
pub const LABEL_GAP_PX: f64 = 6.0;

// ── Presence ────────────────────────────────────────────────────

/// Cursor liveness window; 0 keeps cursors until the hub removes them.
/// Peers only send cursor samples while moving, so any nonzero window also
/// drops idle peers that are still connected.
pub const DEFAULT_CURSOR_TTL_MS: u64 = 0;
