//! Presence store: last-known cursor state per remote participant.
//!
//! SYSTEM CONTEXT
//! ==============
//! Presence is ephemeral. Entries are created or replaced on every inbound
//! cursor sample and removed on an explicit `cursor_remove`. A peer that drops
//! without announcing its departure would otherwise linger forever, so the
//! store can optionally expire entries that have not been refreshed within a
//! liveness window.
//!
//! The store is keyed in id order so the overlay paints cursors in a stable
//! order from frame to frame.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use frames::CursorPayload;

use crate::geom::Point;

/// What the overlay needs to draw one participant's cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub position: Point,
    /// Display name; `None` until the participant sets one.
    pub display_name: Option<String>,
    /// CSS color string for the marker.
    pub color: String,
    /// Marker radius in pixels.
    pub size: f64,
}

impl From<&CursorPayload> for CursorState {
    fn from(payload: &CursorPayload) -> Self {
        Self {
            position: Point::new(payload.x, payload.y),
            display_name: payload.username.clone(),
            color: payload.color.clone(),
            size: payload.size,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    state: CursorState,
    refreshed_at: Instant,
}

/// Cursor state keyed by participant id.
#[derive(Debug, Clone, Default)]
pub struct PresenceStore {
    entries: BTreeMap<String, Entry>,
    ttl: Option<Duration>,
}

impl PresenceStore {
    /// A store with no liveness expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that drops entries not refreshed within `ttl`; `None` disables expiry.
    #[must_use]
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self { entries: BTreeMap::new(), ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Insert or replace the entry for `id`.
    pub fn upsert(&mut self, id: impl Into<String>, state: CursorState, now: Instant) {
        self.entries.insert(id.into(), Entry { state, refreshed_at: now });
    }

    /// Delete the entry for `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CursorState> {
        self.entries.get(id).map(|entry| &entry.state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current mapping for rendering, in participant id order.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, CursorState> {
        self.entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.state.clone()))
            .collect()
    }

    /// Remove entries older than the TTL as of `now`; returns the expired ids.
    pub fn expire(&mut self, now: Instant) -> Vec<String> {
        let Some(ttl) = self.ttl else {
            return Vec::new();
        };
        let stale = self
            .entries
            .iter()
            .filter_map(|(id, entry)| {
                (now.saturating_duration_since(entry.refreshed_at) > ttl).then(|| id.clone())
            })
            .collect::<Vec<_>>();
        for id in &stale {
            self.entries.remove(id);
        }
        stale
    }
}
