#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use linestep::DebugResult;
use linestep::engine::{ExecutionError, HostEngine, LineEvent, TraceHooks};
use linestep::protocol::{self, Message};
use linestep::transport::StreamTransport;
use tempfile::{NamedTempFile, TempDir};

pub type ScriptedStream = StreamTransport<Cursor<Vec<u8>>, Vec<u8>>;

/// Engine that replays a fixed list of line events instead of running code
pub struct ReplayEngine {
    pub events: Vec<LineEvent>,
    pub fault: Option<String>,
}

impl ReplayEngine {
    /// Every line belongs to the target file
    pub fn lines(lines: &[u32]) -> Self {
        Self {
            events: lines
                .iter()
                .map(|&line| LineEvent::new("main.sh", line, true))
                .collect(),
            fault: None,
        }
    }

    pub fn events(events: &[(u32, bool)]) -> Self {
        Self {
            events: events
                .iter()
                .map(|&(line, is_target_file)| {
                    let path = if is_target_file { "main.sh" } else { "lib.sh" };
                    LineEvent::new(path, line, is_target_file)
                })
                .collect(),
            fault: None,
        }
    }

    pub fn with_fault(mut self, fault: &str) -> Self {
        self.fault = Some(fault.to_string());
        self
    }
}

impl HostEngine for ReplayEngine {
    fn canonicalize(&self, path: &Path) -> DebugResult<PathBuf> {
        Ok(path.to_path_buf())
    }

    fn run(&mut self, _target: &Path, hooks: &mut dyn TraceHooks) -> Result<(), ExecutionError> {
        for event in &self.events {
            hooks.on_line(event)?;
        }
        match self.fault.take() {
            Some(fault) => Err(ExecutionError::Fault(fault)),
            None => Ok(()),
        }
    }
}

/// Client input: clientinit followed by `continues` continue messages
pub fn client_input(continues: usize) -> String {
    let mut input = protocol::encode(&Message::ClientInit).unwrap();
    for _ in 0..continues {
        input.push_str(&protocol::encode(&Message::Continue).unwrap());
    }
    input
}

pub fn scripted_stream(input: &str) -> ScriptedStream {
    scripted_stream_bytes(input.as_bytes().to_vec())
}

/// Like `scripted_stream`, for input that is not valid UTF-8
pub fn scripted_stream_bytes(input: Vec<u8>) -> ScriptedStream {
    StreamTransport::new(Cursor::new(input), Vec::new())
}

/// Decode everything the controller wrote
pub fn sent_messages(transport: ScriptedStream) -> Vec<Message> {
    let (_, written) = transport.into_parts();
    decode_all(&written)
}

pub fn decode_all(bytes: &[u8]) -> Vec<Message> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| protocol::decode(line).unwrap())
        .collect()
}

pub fn break_lines(messages: &[Message]) -> Vec<u32> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Break { linenumber } => Some(*linenumber),
            _ => None,
        })
        .collect()
}

pub fn kinds(messages: &[Message]) -> Vec<&'static str> {
    messages.iter().map(Message::kind).collect()
}

/// Write a script into a temp file
pub fn script(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Write a script into a temp dir, for tests that need a stable path
pub fn script_in(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
