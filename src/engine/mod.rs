// Host execution engine boundary: runs a target file and reports line boundaries

pub mod script;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::{DebugError, DebugResult};

pub use script::{Script, ScriptEngine, Statement};

/// Where the engine is about to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: u32,
}

/// One line-boundary notification from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEvent {
    pub location: SourceLocation,
    /// Whether the frame belongs to the monitored top-level file.
    pub is_target_file: bool,
}

impl LineEvent {
    pub fn new(path: impl Into<PathBuf>, line: u32, is_target_file: bool) -> Self {
        Self {
            location: SourceLocation {
                path: path.into(),
                line,
            },
            is_target_file,
        }
    }
}

/// Callbacks the engine invokes synchronously while evaluating a target. The
/// engine does not advance until a callback returns.
///
/// Only line boundaries are acted on; call, return and exception
/// notifications are accepted and ignored.
pub trait TraceHooks {
    fn on_line(&mut self, event: &LineEvent) -> DebugResult<()>;

    fn on_call(&mut self, _location: &SourceLocation) -> DebugResult<()> {
        Ok(())
    }

    fn on_return(&mut self, _location: &SourceLocation) -> DebugResult<()> {
        Ok(())
    }

    fn on_exception(&mut self, _location: &SourceLocation, _fault: &str) -> DebugResult<()> {
        Ok(())
    }
}

/// Why a target run ended early
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The target program itself failed.
    #[error("target fault: {0}")]
    Fault(String),
    /// A trace hook failed and the engine unwound the target.
    #[error(transparent)]
    Aborted(#[from] DebugError),
}

/// Capability to execute a source file under line instrumentation.
pub trait HostEngine {
    /// Canonical form of `path`, used for every location comparison.
    fn canonicalize(&self, path: &Path) -> DebugResult<PathBuf>;

    /// Evaluate the top-level code of `target`, calling `hooks` at every line
    /// boundary on the calling thread.
    fn run(&mut self, target: &Path, hooks: &mut dyn TraceHooks) -> Result<(), ExecutionError>;
}

/// Canonicalize through the filesystem, mapping failures to `TargetUnavailable`.
pub fn canonicalize_file(path: &Path) -> DebugResult<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| DebugError::TargetUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
