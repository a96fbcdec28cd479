//! Types shared between the stream client and the UI.

mod command;
mod event;
mod snapshot;
mod state;

pub use command::Command;
pub use event::Event;
pub use snapshot::{LengthMismatch, Snapshot};
pub use state::{ClientConfig, ConnectionState};
