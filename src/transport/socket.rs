use std::io::{self, BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};

use super::{Transport, read_line, write_message};
use crate::error::DebugResult;
use crate::protocol::Message;

/// Listening half of the socket transport. Bound to an ephemeral port and
/// consumed by the single `accept`.
#[derive(Debug)]
pub struct SocketListener {
    listener: TcpListener,
    host: String,
    port: u16,
}

impl SocketListener {
    /// Bind an available port on `host`.
    pub fn bind(host: &str) -> DebugResult<Self> {
        let listener = TcpListener::bind((host, 0))?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            listener,
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn server_init(&self) -> Message {
        Message::server_init_at(self.host.clone(), self.port)
    }

    /// Tell a client where to connect, out of band, before blocking in `accept`.
    pub fn announce<W: Write + ?Sized>(&self, out: &mut W) -> DebugResult<()> {
        write_message(out, &self.server_init())
    }

    /// Block until exactly one client connects. The listening socket is
    /// dropped afterwards, so no second client is ever accepted.
    pub fn accept(self) -> DebugResult<SocketTransport> {
        let (stream, peer) = self.listener.accept()?;
        tracing::info!(%peer, port = self.port, "client connected");
        SocketTransport::from_stream(stream, self.host, self.port)
    }
}

/// Transport over one accepted TCP connection
pub struct SocketTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    host: String,
    port: u16,
}

impl SocketTransport {
    fn from_stream(stream: TcpStream, host: String, port: u16) -> DebugResult<Self> {
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            host,
            port,
        })
    }
}

impl Transport for SocketTransport {
    fn send(&mut self, message: &Message) -> DebugResult<()> {
        write_message(&mut self.writer, message)
    }

    fn receive_line(&mut self) -> DebugResult<String> {
        read_line(&mut self.reader)
    }

    fn server_init(&self) -> Message {
        Message::server_init_at(self.host.clone(), self.port)
    }

    fn close(&mut self) -> DebugResult<()> {
        self.writer.flush()?;
        match self.writer.shutdown(Shutdown::Both) {
            // Peer may already have hung up after reading `finish`
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e.into()),
            _ => Ok(()),
        }
    }
}
