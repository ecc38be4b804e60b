// Duplex line transports carrying the protocol between controller and client

pub mod loopback;
pub mod socket;
pub mod stream;

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{DebugError, DebugResult};
use crate::protocol::{self, Message};

pub use loopback::LoopbackTransport;
pub use socket::{SocketListener, SocketTransport};
pub use stream::StreamTransport;

/// Which transport a session runs over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// stdin for client messages, stderr for controller messages
    #[default]
    Stream,
    /// a single accepted TCP connection on an ephemeral port
    Socket,
    /// no client; breaks are written out but never waited on
    None,
}

/// A duplex channel for protocol lines.
///
/// Every call blocks the calling thread, which is the target's execution
/// thread while a session is running.
pub trait Transport: Send {
    /// Write one complete message line and flush it.
    fn send(&mut self, message: &Message) -> DebugResult<()>;

    /// Block until a full line arrives from the peer.
    fn receive_line(&mut self) -> DebugResult<String>;

    /// The `serverinit` this transport opens the session with.
    fn server_init(&self) -> Message {
        Message::server_init()
    }

    /// Whether a client exists that answers handshakes and breaks.
    fn has_peer(&self) -> bool {
        true
    }

    /// Flush and release the underlying connection.
    fn close(&mut self) -> DebugResult<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, message: &Message) -> DebugResult<()> {
        (**self).send(message)
    }

    fn receive_line(&mut self) -> DebugResult<String> {
        (**self).receive_line()
    }

    fn server_init(&self) -> Message {
        (**self).server_init()
    }

    fn has_peer(&self) -> bool {
        (**self).has_peer()
    }

    fn close(&mut self) -> DebugResult<()> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, message: &Message) -> DebugResult<()> {
        (**self).send(message)
    }

    fn receive_line(&mut self) -> DebugResult<String> {
        (**self).receive_line()
    }

    fn server_init(&self) -> Message {
        (**self).server_init()
    }

    fn has_peer(&self) -> bool {
        (**self).has_peer()
    }

    fn close(&mut self) -> DebugResult<()> {
        (**self).close()
    }
}

/// Write a message as a single `write_all` so readers never observe half a line.
pub(crate) fn write_message<W: Write + ?Sized>(writer: &mut W, message: &Message) -> DebugResult<()> {
    let line = protocol::encode(message)?;
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read one newline-terminated line. EOF, including EOF in the middle of a
/// line, means the peer went away. A line that is not UTF-8 is malformed.
pub(crate) fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> DebugResult<String> {
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf)?;

    if n == 0 || buf.last() != Some(&b'\n') {
        return Err(DebugError::TransportClosed);
    }

    String::from_utf8(buf).map_err(|e| {
        let line = String::from_utf8_lossy(e.as_bytes()).into_owned();
        DebugError::malformed(&line, e.utf8_error().to_string())
    })
}
