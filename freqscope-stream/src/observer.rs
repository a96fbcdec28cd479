use flume::{Sender, TrySendError};
use freqscope_messages::{ConnectionState, Event, Snapshot};
use log::{debug, trace, warn};

use crate::error::{MessageError, TransportError};

/// Receives everything the stream worker produces.
///
/// Callbacks run on the worker thread, synchronously with the message that
/// caused them, so snapshots arrive in the order the transport delivered them.
pub trait StreamObserver: Send + 'static {
    /// Called once per accepted message.
    fn on_snapshot(&mut self, snapshot: Snapshot);

    fn on_state_change(&mut self, _state: ConnectionState) {}

    /// Called for every discarded message.
    fn on_rejected(&mut self, _error: &MessageError) {}

    fn on_transport_error(&mut self, _error: &TransportError) {}
}

/// Forward snapshots and state changes to another thread.
///
/// Never blocks the worker: on a bounded channel that is full, the event is
/// dropped.
impl StreamObserver for Sender<Event> {
    fn on_snapshot(&mut self, snapshot: Snapshot) {
        match self.try_send(Event::Snapshot(snapshot)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("Event queue full, dropping snapshot"),
            Err(TrySendError::Disconnected(_)) => {
                debug!("Event receiver is gone, dropping snapshot")
            }
        }
    }

    fn on_state_change(&mut self, state: ConnectionState) {
        if let Err(TrySendError::Full(_)) = self.try_send(Event::ConnectionChanged(state)) {
            warn!("Event queue full, dropping state change to {state}");
        }
    }
}
