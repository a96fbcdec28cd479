use std::fmt;
use std::time::Duration;

/// Lifecycle phase of the streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// A connection attempt is in flight.
    Connecting = 0,
    /// Connected; inbound messages are processed only in this state.
    Open = 1,
    /// Not connected. Terminal after an explicit stop.
    Closed = 2,
    /// Waiting out the fixed delay before the next attempt.
    Reconnecting = 3,
}

impl ConnectionState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Connecting),
            1 => Some(Self::Open),
            2 => Some(Self::Closed),
            3 => Some(Self::Reconnecting),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(name)
    }
}

/// Configuration for the stream client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket address of the spectrum source.
    pub endpoint: String,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Upper bound for TCP connect plus handshake.
    pub connect_timeout: Duration,
    /// How long a socket read may block before the worker checks for commands.
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "ws://127.0.0.1:6789";

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            reconnect_delay: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(100),
        }
    }
}
