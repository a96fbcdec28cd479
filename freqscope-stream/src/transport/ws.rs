use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use freqscope_messages::ClientConfig;
use log::debug;
use tungstenite::client::IntoClientRequest;
use tungstenite::{HandshakeError, Message, WebSocket};

use super::{Connector, Transport};
use crate::error::TransportError;

/// Plain `ws://` connector built on a blocking `TcpStream`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect(&mut self, config: &ClientConfig) -> Result<Box<dyn Transport>, TransportError> {
        let endpoint_error = |reason: String| TransportError::Endpoint {
            endpoint: config.endpoint.clone(),
            reason,
        };

        let request = config
            .endpoint
            .as_str()
            .into_client_request()
            .map_err(|e| endpoint_error(e.to_string()))?;

        let (host, port) = {
            let uri = request.uri();
            if uri.scheme_str() != Some("ws") {
                return Err(endpoint_error("only ws:// endpoints are supported".into()));
            }
            let host = uri
                .host()
                .ok_or_else(|| endpoint_error("missing host".into()))?
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string();
            (host, uri.port_u16().unwrap_or(80))
        };

        let addrs: Vec<SocketAddr> = (host.as_str(), port)
            .to_socket_addrs()
            .map_err(TransportError::Connect)?
            .collect();
        let stream = connect_first(&addrs, config.connect_timeout)?;

        // Bound the handshake; a silent peer surfaces as `Interrupted`.
        stream
            .set_read_timeout(Some(config.connect_timeout))
            .map_err(TransportError::Connect)?;
        stream
            .set_write_timeout(Some(config.connect_timeout))
            .map_err(TransportError::Connect)?;

        let (socket, _response) = tungstenite::client(request, stream).map_err(|e| match e {
            HandshakeError::Interrupted(_) => TransportError::Handshake("timed out".into()),
            HandshakeError::Failure(err) => TransportError::Handshake(err.to_string()),
        })?;

        socket
            .get_ref()
            .set_read_timeout(Some(config.poll_interval))
            .map_err(TransportError::Connect)?;

        Ok(Box::new(WsTransport { socket }))
    }
}

fn connect_first(addrs: &[SocketAddr], timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("Connecting to {addr} failed: {e}");
                last_err = Some(e);
            }
        }
    }
    Err(TransportError::Connect(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

pub struct WsTransport {
    socket: WebSocket<TcpStream>,
}

impl Transport for WsTransport {
    fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.socket.read() {
            Ok(Message::Text(text)) => Ok(Some(text.as_str().as_bytes().to_vec())),
            Ok(Message::Binary(data)) => Ok(Some(data.to_vec())),
            Ok(Message::Close(frame)) => {
                let reason = match frame {
                    Some(frame) => format!(
                        "peer sent close {} {}",
                        u16::from(frame.code),
                        frame.reason.as_str()
                    ),
                    None => "peer sent close".to_string(),
                };
                Err(TransportError::Closed(reason))
            }
            // Pings are answered by tungstenite on the next read.
            Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => Ok(None),
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                Ok(None)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Err(TransportError::Closed("connection closed".into()))
            }
            Err(e) => Err(TransportError::Lost(e.to_string())),
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.socket.close(None) {
            debug!("Error while closing websocket: {e}");
        }
        let _ = self.socket.flush();
    }
}
