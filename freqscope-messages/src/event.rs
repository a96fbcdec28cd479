use crate::{ConnectionState, Snapshot};

/// Events sent from the stream worker to the UI, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A validated spectrum snapshot decoded from one inbound message.
    Snapshot(Snapshot),
    /// The connection moved to a new lifecycle phase.
    ConnectionChanged(ConnectionState),
}
