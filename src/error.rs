use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a debug session. None of these are recovered locally:
/// every variant aborts the session it occurs in.
#[derive(Debug, Error)]
pub enum DebugError {
    #[error("malformed message {line:?}: {reason}")]
    MalformedMessage { line: String, reason: String },
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("protocol violation: expected '{expected}' message, received '{received}'")]
    ProtocolViolation {
        expected: &'static str,
        received: String,
    },
    #[error("transport closed by peer")]
    TransportClosed,
    #[error("transport i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("target {path:?} is unavailable: {source}")]
    TargetUnavailable { path: PathBuf, source: io::Error },
}

impl DebugError {
    pub fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            line: line.trim_end().to_string(),
            reason: reason.into(),
        }
    }
}

pub type DebugResult<T> = Result<T, DebugError>;
