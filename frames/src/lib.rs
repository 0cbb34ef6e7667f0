//! Shared message model and JSON codec for the whiteboard WS transport.
//!
//! Every message on the wire is one JSON object whose `type` field selects
//! the schema. Decoding goes through a single tagged enum so dispatch sites
//! can match exhaustively; tags this client does not know about land in
//! [`Message::Unknown`] instead of failing the whole connection.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Error returned by [`decode`] and [`encode`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload was not valid JSON or did not match the schema for its tag.
    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
    /// The message is an inbound-only placeholder and has no wire form.
    #[error("cannot encode message of type `{0}`")]
    Encode(&'static str),
}

/// A single message on the realtime wire protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Hub assigns the connection its identity.
    Init {
        /// Opaque participant id for this connection.
        id: String,
    },
    /// Wipe the shared drawing surface.
    Clear,
    /// One stroke segment.
    Draw(DrawPayload),
    /// A participant's live cursor sample.
    Cursor(CursorPayload),
    /// A participant's cursor left the canvas or disconnected.
    CursorRemove {
        /// Participant whose cursor should disappear.
        id: String,
    },
    /// Full, ordered roster of display names.
    UsersUpdate {
        /// Display names in hub order.
        users: Vec<String>,
    },
    /// Local participant renamed themselves.
    ChangeUsername {
        /// New display name.
        name: String,
    },
    /// Any tag this client does not understand.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl Message {
    /// Wire tag for this message, for logging.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Clear => "clear",
            Self::Draw(_) => "draw",
            Self::Cursor(_) => "cursor",
            Self::CursorRemove { .. } => "cursor_remove",
            Self::UsersUpdate { .. } => "users_update",
            Self::ChangeUsername { .. } => "change_username",
            Self::Unknown => "unknown",
        }
    }
}

/// Payload of a `draw` message: a straight segment from `(last_x, last_y)` to `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawPayload {
    pub last_x: f64,
    pub last_y: f64,
    pub x: f64,
    pub y: f64,
    /// CSS color string, e.g. `"#000"`.
    pub color: String,
    /// Line width in pixels.
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    pub size: f64,
}

/// Payload of a `cursor` message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CursorPayload {
    /// Participant the cursor belongs to.
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// CSS color string used for the cursor marker.
    pub color: String,
    /// Marker radius in pixels.
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    pub size: f64,
    /// Display name, if the participant has set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Decode one JSON text message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON, a missing `type` field,
/// or a known tag whose fields do not match its schema.
pub fn decode(text: &str) -> Result<Message, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a message into its JSON text form.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] for [`Message::Unknown`], which only exists
/// on the inbound side.
pub fn encode(message: &Message) -> Result<String, CodecError> {
    if matches!(message, Message::Unknown) {
        return Err(CodecError::Encode(message.tag()));
    }
    Ok(serde_json::to_string(message)?)
}

/// Accept a number or a numeric string. Browser form controls report their
/// value as a string, and older peers forward it unchanged.
fn deserialize_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(D::Error::custom(format!("expected finite number, got {value}"))),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
