use freqscope_messages::LengthMismatch;
use thiserror::Error;

/// Failures of the underlying connection. Always answered with a reconnect.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint {endpoint}: {reason}")]
    Endpoint { endpoint: String, reason: String },
    #[error("could not connect: {0}")]
    Connect(#[source] std::io::Error),
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("connection lost: {0}")]
    Lost(String),
    #[error("connection closed: {0}")]
    Closed(String),
}

/// Why an inbound message was discarded. The connection stays open.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The payload is not JSON at all.
    #[error("undecodable payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Valid JSON with the wrong shape.
    #[error("unexpected data format: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is not a list of numbers: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error(transparent)]
    LengthMismatch(#[from] LengthMismatch),
}

impl MessageError {
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}
