// Debug session state machine: handshake, tracer, break controller, driver

pub mod breaker;
pub mod driver;
pub mod handshake;
pub mod tracer;

use std::path::{Path, PathBuf};

use crate::error::DebugResult;
use crate::protocol::Message;
use crate::transport::Transport;

pub use breaker::{BreakController, BreakState};
pub use driver::{SessionDriver, SessionOptions};
pub use tracer::ExecutionTracer;

/// Outcome of a session that reached `finish`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Number of `break` messages emitted
    pub breaks: usize,
    /// Fault raised by the target program, if it stopped early. Not relayed
    /// to the client.
    pub fault: Option<String>,
}

/// A live debug run. Owns its transport exclusively.
pub struct Session<T> {
    target: PathBuf,
    transport: T,
    last_line: Option<u32>,
    controller: BreakController,
    breaks: usize,
}

impl<T: Transport> Session<T> {
    pub fn new(target: PathBuf, transport: T, controller: BreakController) -> Self {
        Self {
            target,
            transport,
            last_line: None,
            controller,
            breaks: 0,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn last_line(&self) -> Option<u32> {
        self.last_line
    }

    pub fn breaks(&self) -> usize {
        self.breaks
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `finish` and release the transport.
    pub(crate) fn finish(&mut self, fault: Option<String>) -> DebugResult<SessionReport> {
        self.transport.send(&Message::Finish)?;
        self.transport.close()?;

        Ok(SessionReport {
            breaks: self.breaks,
            fault,
        })
    }
}
