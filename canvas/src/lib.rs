//! Client-side drawing and presence engine for the shared whiteboard.
//!
//! This crate owns everything a client does between the socket and the
//! screen: translating pointer input into stroke segments and cursor samples
//! (with optimistic local echo), compositing inbound segments onto the
//! persistent drawing surface, tracking peers' live cursors, and redrawing the
//! transient cursor overlay once per frame. It performs no I/O; the host binary
//! feeds it decoded [`frames::Message`]s and sends back whatever it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: identity, routing, and component ownership |
//! | [`input`] | Pointer state machine and tool settings (Input Capture) |
//! | [`stroke`] | Stroke segments and the persistent drawing surface |
//! | [`presence`] | Per-participant cursor state with optional liveness expiry |
//! | [`overlay`] | Cursor overlay renderer and the frame loop that drives it |
//! | [`raster`] | RGBA pixel layers with opaque compositing |
//! | [`color`] | CSS hex color parsing |
//! | [`geom`] | Points and canvas bounds |
//! | [`consts`] | Shared defaults (surface size, brush, label spacing, TTL) |

pub mod color;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod input;
pub mod overlay;
pub mod presence;
pub mod raster;
pub mod stroke;
