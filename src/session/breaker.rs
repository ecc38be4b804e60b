use std::thread;
use std::time::Duration;

use crate::error::{DebugError, DebugResult};
use crate::protocol::{self, Message};
use crate::transport::Transport;

/// Phases of a single break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    Reporting,
    AwaitingContinue,
    Resumed,
}

/// Reports a break and holds the calling thread until the client continues.
pub struct BreakController {
    delay: Option<Duration>,
}

impl BreakController {
    pub fn new(delay: Option<Duration>) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Run one break at `line` through to `Resumed`.
    pub fn suspend<T: Transport + ?Sized>(&self, transport: &mut T, line: u32) -> DebugResult<()> {
        let mut state = BreakState::Reporting;

        loop {
            state = match state {
                BreakState::Reporting => {
                    tracing::debug!(line, "break");
                    transport.send(&Message::break_at(line))?;
                    BreakState::AwaitingContinue
                }
                BreakState::AwaitingContinue => {
                    if transport.has_peer() {
                        await_continue(transport)?;
                    }
                    BreakState::Resumed
                }
                BreakState::Resumed => {
                    if let Some(delay) = self.delay {
                        thread::sleep(delay);
                    }
                    tracing::trace!(line, "resumed");
                    return Ok(());
                }
            };
        }
    }
}

fn await_continue<T: Transport + ?Sized>(transport: &mut T) -> DebugResult<()> {
    let line = transport.receive_line()?;

    match protocol::decode(&line)? {
        Message::Continue => Ok(()),
        other => Err(DebugError::ProtocolViolation {
            expected: "continue",
            received: other.kind().to_string(),
        }),
    }
}
