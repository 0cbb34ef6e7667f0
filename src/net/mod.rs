//! Hub connection: the socket task, its events, and reconnect pacing.

pub mod backoff;
pub mod sync_client;

/// Connection lifecycle as seen by the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// What the socket task reports to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetEvent {
    Status(ConnectionStatus),
    /// One inbound text message, undecoded.
    Text(String),
}
