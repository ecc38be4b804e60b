use std::io::{self, BufRead, BufReader, Stderr, Stdin, Write};

use super::{Transport, read_line, write_message};
use crate::error::DebugResult;
use crate::protocol::Message;

/// Transport over a pair of already-open process-local streams.
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> StreamTransport<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl StreamTransport<BufReader<Stdin>, Stderr> {
    /// Client messages on stdin, controller messages on stderr. The target's
    /// own output keeps stdout to itself.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> Transport for StreamTransport<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn send(&mut self, message: &Message) -> DebugResult<()> {
        write_message(&mut self.writer, message)
    }

    fn receive_line(&mut self) -> DebugResult<String> {
        read_line(&mut self.reader)
    }

    fn close(&mut self) -> DebugResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DebugError;
    use std::io::Cursor;

    #[test]
    fn sends_to_writer_and_reads_from_reader() {
        let reader = Cursor::new(b"{\"type\":\"clientinit\"}\n".to_vec());
        let mut transport = StreamTransport::new(reader, Vec::new());

        transport.send(&Message::server_init()).unwrap();
        let line = transport.receive_line().unwrap();
        assert_eq!(line.trim_end(), "{\"type\":\"clientinit\"}");

        let (_, written) = transport.into_parts();
        assert_eq!(written, b"{\"type\":\"serverinit\"}\n");
    }

    #[test]
    fn exhausted_reader_reports_closed() {
        let mut transport = StreamTransport::new(Cursor::new(Vec::new()), Vec::new());
        assert!(matches!(
            transport.receive_line(),
            Err(DebugError::TransportClosed)
        ));
    }

    #[test]
    fn server_init_has_no_address() {
        let transport = StreamTransport::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(transport.server_init(), Message::server_init());
        assert!(transport.has_peer());
    }
}
