mod decode;
mod error;
mod machine;
mod observer;
mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};

use flume::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use freqscope_messages::{ClientConfig, Command, ConnectionState};
use log::{debug, error, info, trace, warn};

pub use decode::{FREQUENCIES, MAGNITUDES, decode_message};
pub use error::{MessageError, SchemaError, TransportError};
pub use machine::{ConnectionMachine, Input};
pub use observer::StreamObserver;
pub use transport::{Connector, Transport, WsConnector, WsTransport};

/// Read-only view of the worker's connection state.
#[derive(Debug, Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new(state: ConnectionState) -> Self {
        Self(Arc::new(AtomicU8::new(state.as_u8())))
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire)).unwrap_or(ConnectionState::Closed)
    }

    fn set(&self, state: ConnectionState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

/// Keeps one logical connection to a spectrum source alive.
///
/// The connection runs on a worker thread that reconnects on its own, with
/// a fixed delay and no attempt limit, until `stop()` is called or the client
/// is dropped.
pub struct StreamClient {
    config: ClientConfig,
    parts: Option<(Box<dyn Connector>, Box<dyn StreamObserver>)>,
    cmd_tx: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
    state: SharedState,
    stopped: bool,
}

impl StreamClient {
    pub fn new(
        config: ClientConfig,
        connector: impl Connector,
        observer: impl StreamObserver,
    ) -> Self {
        let connector: Box<dyn Connector> = Box::new(connector);
        let observer: Box<dyn StreamObserver> = Box::new(observer);
        Self {
            config,
            parts: Some((connector, observer)),
            cmd_tx: None,
            worker: None,
            state: SharedState::new(ConnectionState::Closed),
            stopped: false,
        }
    }

    /// Client for a `ws://` endpoint.
    pub fn websocket(config: ClientConfig, observer: impl StreamObserver) -> Self {
        Self::new(config, WsConnector, observer)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_started(&self) -> bool {
        self.worker.is_some()
    }

    /// Begin connecting. Does nothing if already started or stopped.
    pub fn start(&mut self) {
        if self.stopped {
            warn!("Stream client was stopped, ignoring start");
            return;
        }
        let Some((connector, observer)) = self.parts.take() else {
            debug!("Stream client already started");
            return;
        };

        let (cmd_tx, cmd_rx) = flume::unbounded();
        let worker = Worker {
            config: self.config.clone(),
            connector,
            observer,
            cmd_rx,
            machine: ConnectionMachine::new(),
            state: self.state.clone(),
        };

        self.state.set(ConnectionState::Connecting);
        let spawned = thread::Builder::new()
            .name("freqscope-stream".into())
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => {
                self.cmd_tx = Some(cmd_tx);
                self.worker = Some(handle);
            }
            Err(e) => {
                error!("Could not spawn stream worker: {e}");
                self.state.set(ConnectionState::Closed);
                self.stopped = true;
            }
        }
    }

    /// Close the connection and cancel any pending reconnect, blocking until
    /// the worker exits. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.parts = None;

        if let Some(cmd_tx) = self.cmd_tx.take() {
            let _ = cmd_tx.send(Command::Stop);
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("Stream worker panicked");
            }
        }
        self.state.set(ConnectionState::Closed);
        info!("Stream client stopped");
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        self.stop();
    }
}

enum Flow {
    Reconnect,
    Exit,
}

/// Owns the connection and the state machine on the worker thread.
struct Worker {
    config: ClientConfig,
    connector: Box<dyn Connector>,
    observer: Box<dyn StreamObserver>,
    cmd_rx: Receiver<Command>,
    machine: ConnectionMachine,
    state: SharedState,
}

impl Worker {
    fn run(mut self) {
        self.apply(Input::Start);

        loop {
            let flow = match self.connector.connect(&self.config) {
                Ok(transport) => {
                    info!("Connected to {}", self.config.endpoint);
                    self.apply(Input::Connected);
                    self.pump(transport)
                }
                Err(e) => {
                    warn!("Connecting to {} failed: {e}", self.config.endpoint);
                    self.observer.on_transport_error(&e);
                    self.apply(Input::Disconnected);
                    Flow::Reconnect
                }
            };
            if let Flow::Exit = flow {
                break;
            }

            self.apply(Input::ScheduleRetry);
            info!(
                "Retrying {} in {:?}",
                self.config.endpoint, self.config.reconnect_delay
            );
            match self.cmd_rx.recv_timeout(self.config.reconnect_delay) {
                Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.apply(Input::RetryElapsed);
                }
            }
        }

        self.apply(Input::Stop);
        debug!("Stream worker exiting");
    }

    /// Process inbound messages until the connection drops or a stop arrives.
    fn pump(&mut self, mut transport: Box<dyn Transport>) -> Flow {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(Command::Stop) | Err(TryRecvError::Disconnected) => {
                    transport.close();
                    return Flow::Exit;
                }
                Err(TryRecvError::Empty) => {}
            }

            match transport.recv() {
                Ok(Some(payload)) => self.handle_payload(&payload),
                Ok(None) => {}
                Err(e) => {
                    warn!("Connection to {} closed, retrying: {e}", self.config.endpoint);
                    self.observer.on_transport_error(&e);
                    transport.close();
                    self.apply(Input::Disconnected);
                    return Flow::Reconnect;
                }
            }
        }
    }

    fn handle_payload(&mut self, payload: &[u8]) {
        if !self.machine.accepts_messages() {
            return;
        }
        match decode_message(payload) {
            Ok(snapshot) => {
                trace!("Received snapshot with {} bins", snapshot.len());
                self.observer.on_snapshot(snapshot);
            }
            Err(e) => {
                warn!("Discarding message: {e}");
                self.observer.on_rejected(&e);
            }
        }
    }

    fn apply(&mut self, input: Input) {
        if let Some(state) = self.machine.apply(input) {
            debug!("Connection state -> {state}");
            self.state.set(state);
            self.observer.on_state_change(state);
        }
    }
}
