use std::path::Path;
use std::time::Duration;

use super::{BreakController, ExecutionTracer, Session, SessionReport, handshake};
use crate::engine::{ExecutionError, HostEngine};
use crate::error::DebugResult;
use crate::transport::Transport;

/// Settings that apply to every break of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Fixed pause after each `continue` before the target advances
    pub delay: Option<Duration>,
}

/// Runs one target from handshake to `finish`.
#[derive(Debug, Clone, Default)]
pub struct SessionDriver {
    options: SessionOptions,
}

impl SessionDriver {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    /// Handshake, run `target` under the tracer, then send `finish`.
    ///
    /// The target path is canonicalized once the client is attached; a target
    /// that cannot be resolved aborts the session after `serverinit`.
    ///
    /// A fault in the target program still ends with `finish` and is reported
    /// in the returned `SessionReport`. Protocol and transport errors abort
    /// the session without `finish`.
    pub fn run<E, T>(&self, engine: &mut E, mut transport: T, target: &Path) -> DebugResult<SessionReport>
    where
        E: HostEngine + ?Sized,
        T: Transport,
    {
        handshake::perform(&mut transport).inspect_err(|e| {
            tracing::error!(error = %e, "handshake failed");
        })?;

        let target = engine.canonicalize(target)?;

        let controller = BreakController::new(self.options.delay);
        let mut session = Session::new(target.clone(), transport, controller);
        tracing::info!(target = %session.target().display(), "running target");

        let result = engine.run(&target, &mut ExecutionTracer::new(&mut session));

        let fault = match result {
            Ok(()) => None,
            Err(ExecutionError::Fault(fault)) => {
                tracing::warn!(%fault, "target stopped with a fault");
                Some(fault)
            }
            Err(ExecutionError::Aborted(e)) => {
                tracing::error!(error = %e, line = ?session.last_line(), "session aborted");
                return Err(e);
            }
        };

        let report = session.finish(fault)?;
        tracing::info!(breaks = report.breaks, "session finished");
        Ok(report)
    }
}
