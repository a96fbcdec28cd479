//! Connection lifecycle, independent of any transport.
//!
//! ```text
//! Closed --Start--> Connecting --Connected--> Open
//!   ^                   |                       |
//!   |              Disconnected            Disconnected
//!   |                   v                       |
//!   +----------------Closed <-------------------+
//!                       |
//!                  ScheduleRetry
//!                       v
//!                 Reconnecting --RetryElapsed--> Connecting
//! ```
//!
//! `Stop` moves any state to `Closed` and no input leaves a stopped machine.

use freqscope_messages::ConnectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Start,
    Connected,
    Disconnected,
    ScheduleRetry,
    RetryElapsed,
    Stop,
}

#[derive(Debug)]
pub struct ConnectionMachine {
    state: ConnectionState,
    stopped: bool,
    attempts: u64,
}

impl Default for ConnectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionMachine {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Closed,
            stopped: false,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Connection attempts made so far, including the first.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Only an open connection processes inbound messages.
    pub fn accepts_messages(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Feed an input. Returns the new state if it changed.
    /// Inputs that do not apply to the current state are ignored.
    pub fn apply(&mut self, input: Input) -> Option<ConnectionState> {
        use ConnectionState::*;

        if self.stopped {
            return None;
        }

        let next = match (self.state, input) {
            (_, Input::Stop) => {
                self.stopped = true;
                Closed
            }
            (Closed, Input::Start) | (Reconnecting, Input::RetryElapsed) => {
                self.attempts += 1;
                Connecting
            }
            (Connecting, Input::Connected) => Open,
            (Connecting | Open, Input::Disconnected) => Closed,
            (Closed, Input::ScheduleRetry) => Reconnecting,
            _ => return None,
        };

        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}
