/// Commands sent from the owner of a stream client to its worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Close the connection, cancel any pending reconnect and exit the worker.
    Stop,
}
