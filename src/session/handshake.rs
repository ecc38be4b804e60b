use crate::error::{DebugError, DebugResult};
use crate::protocol::{self, Message};
use crate::transport::Transport;

/// Open a session: announce `serverinit`, then wait for the client's
/// `clientinit`. Any failure while waiting is a `HandshakeFailed`.
///
/// A transport without a peer only announces.
pub fn perform<T: Transport + ?Sized>(transport: &mut T) -> DebugResult<()> {
    let init = transport.server_init();
    transport.send(&init)?;

    if !transport.has_peer() {
        tracing::debug!("no client attached, skipping clientinit");
        return Ok(());
    }

    let line = transport
        .receive_line()
        .map_err(|e| DebugError::HandshakeFailed(e.to_string()))?;

    match protocol::decode(&line) {
        Ok(Message::ClientInit) => {
            tracing::info!("handshake complete");
            Ok(())
        }
        Ok(other) => Err(DebugError::HandshakeFailed(format!(
            "expected 'clientinit', received '{}'",
            other.kind()
        ))),
        Err(e) => Err(DebugError::HandshakeFailed(e.to_string())),
    }
}
