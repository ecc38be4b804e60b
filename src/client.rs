use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::protocol::{self, Message};

/// What the controller reported after a `continue` (or after the handshake)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Break(u32),
    Finished,
}

/// Client side of the protocol for a controller running the socket transport
#[derive(Debug)]
pub struct DebugClient {
    reader: BufReader<TcpStream>,
}

impl DebugClient {
    /// Connect to a controller's announced address
    pub async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            reader: BufReader::new(stream),
        })
    }

    /// Send a message to the controller
    pub async fn send_message(&mut self, message: &Message) -> io::Result<()> {
        let line = protocol::encode(message)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.reader.get_mut().write_all(line.as_bytes()).await?;
        self.reader.get_mut().flush().await?;

        Ok(())
    }

    /// Receive the next message from the controller
    pub async fn recv_message(&mut self) -> io::Result<Message> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;

        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "controller closed connection",
            ));
        }

        protocol::decode(&line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Wait for `serverinit` and answer with `clientinit`
    pub async fn handshake(&mut self) -> io::Result<()> {
        match self.recv_message().await? {
            Message::ServerInit { .. } => self.send_message(&Message::ClientInit).await,
            other => Err(unexpected("serverinit", &other)),
        }
    }

    /// Wait for the next `break` or `finish`
    pub async fn next_event(&mut self) -> io::Result<StepEvent> {
        match self.recv_message().await? {
            Message::Break { linenumber } => Ok(StepEvent::Break(linenumber)),
            Message::Finish => Ok(StepEvent::Finished),
            other => Err(unexpected("break or finish", &other)),
        }
    }

    /// Let the target advance past the current break
    pub async fn resume(&mut self) -> io::Result<()> {
        self.send_message(&Message::Continue).await
    }

    /// Continue through every break, returning the lines in the order reached
    pub async fn run_to_finish(&mut self) -> io::Result<Vec<u32>> {
        let mut lines = Vec::new();
        while let StepEvent::Break(line) = self.next_event().await? {
            lines.push(line);
            self.resume().await?;
        }
        Ok(lines)
    }
}

fn unexpected(expected: &str, received: &Message) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("expected {}, received '{}'", expected, received.kind()),
    )
}
