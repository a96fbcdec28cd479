mod ws;

use freqscope_messages::ClientConfig;

use crate::error::TransportError;

pub use ws::{WsConnector, WsTransport};

/// One established message-based connection.
pub trait Transport {
    /// Wait up to the poll interval for the next message payload.
    /// `Ok(None)` means nothing arrived in time; an error means the
    /// connection is gone.
    fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Close the connection. Errors while closing are not reported.
    fn close(&mut self);
}

/// Opens connections for the stream worker.
pub trait Connector: Send + 'static {
    fn connect(&mut self, config: &ClientConfig) -> Result<Box<dyn Transport>, TransportError>;
}
