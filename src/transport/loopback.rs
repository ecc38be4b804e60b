use std::io::Write;

use super::{Transport, write_message};
use crate::error::{DebugError, DebugResult};
use crate::protocol::Message;

/// Self-driving transport with no client. Messages are written to an
/// observer sink so a plain scripted run still shows where it stepped.
pub struct LoopbackTransport<W> {
    sink: W,
}

impl<W: Write + Send> LoopbackTransport<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> Transport for LoopbackTransport<W> {
    fn send(&mut self, message: &Message) -> DebugResult<()> {
        write_message(&mut self.sink, message)
    }

    // Never reached: without a peer the driver does not wait for replies.
    fn receive_line(&mut self) -> DebugResult<String> {
        Err(DebugError::TransportClosed)
    }

    fn has_peer(&self) -> bool {
        false
    }

    fn close(&mut self) -> DebugResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}
