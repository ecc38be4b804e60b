use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{ExecutionError, HostEngine, LineEvent, TraceHooks, canonicalize_file};
use crate::error::DebugResult;

pub const DEFAULT_SHELL: &str = "sh";

/// One executable line of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based physical line in the script file
    pub line: u32,
    pub command: String,
    /// How many times the command runs back to back (`repeat N: ...`)
    pub repeat: u32,
}

/// A parsed line-oriented shell script
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read script at {:?}", path.as_ref()))?;

        Self::from_string(&content)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let mut statements = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_num = u32::try_from(index + 1).context("Script has too many lines")?;
            let line = line.trim();

            // Blank lines and comments are not statements
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (repeat, command) = match line.strip_prefix("repeat ") {
                Some(rest) => parse_repeat(rest, line_num)?,
                None => (1, line),
            };

            statements.push(Statement {
                line: line_num,
                command: command.to_string(),
                repeat,
            });
        }

        Ok(Script { statements })
    }

    pub fn lines(&self) -> Vec<u32> {
        self.statements.iter().map(|s| s.line).collect()
    }
}

fn parse_repeat(rest: &str, line_num: u32) -> Result<(u32, &str)> {
    let Some((count, command)) = rest.split_once(':') else {
        anyhow::bail!(
            "Invalid repeat on line {}: expected 'repeat N: command'",
            line_num
        );
    };

    let count: u32 = count
        .trim()
        .parse()
        .with_context(|| format!("Invalid repeat count on line {}", line_num))?;
    if count == 0 {
        anyhow::bail!("Repeat count must be positive on line {}", line_num);
    }

    let command = command.trim();
    if command.is_empty() {
        anyhow::bail!("Empty repeat command on line {}", line_num);
    }

    Ok((count, command))
}

/// Engine that evaluates a script one shell command per line.
///
/// Output of the commands is relayed to `output`; their stdin is closed since
/// the controller's stdin may be carrying protocol traffic.
pub struct ScriptEngine<W = Stdout> {
    shell: String,
    output: W,
}

impl ScriptEngine<Stdout> {
    pub fn new(shell: impl Into<String>) -> Self {
        Self::with_output(shell, io::stdout())
    }
}

impl Default for ScriptEngine<Stdout> {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl<W: Write> ScriptEngine<W> {
    pub fn with_output(shell: impl Into<String>, output: W) -> Self {
        Self {
            shell: shell.into(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn execute(&mut self, statement: &Statement) -> std::result::Result<(), String> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&statement.command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("line {}: failed to spawn '{}': {}", statement.line, self.shell, e))?;

        self.output
            .write_all(&output.stdout)
            .and_then(|_| self.output.write_all(&output.stderr))
            .and_then(|_| self.output.flush())
            .map_err(|e| format!("line {}: failed to relay output: {}", statement.line, e))?;

        if !output.status.success() {
            return Err(format!(
                "line {}: '{}' exited with {}",
                statement.line, statement.command, output.status
            ));
        }

        Ok(())
    }
}

impl<W: Write> HostEngine for ScriptEngine<W> {
    fn canonicalize(&self, path: &Path) -> DebugResult<PathBuf> {
        canonicalize_file(path)
    }

    fn run(&mut self, target: &Path, hooks: &mut dyn TraceHooks) -> Result<(), ExecutionError> {
        let script =
            Script::from_file(target).map_err(|e| ExecutionError::Fault(format!("{:#}", e)))?;

        for statement in &script.statements {
            for _ in 0..statement.repeat {
                let event = LineEvent::new(target, statement.line, true);
                hooks.on_line(&event)?;

                if let Err(fault) = self.execute(statement) {
                    hooks.on_exception(&event.location, &fault)?;
                    return Err(ExecutionError::Fault(fault));
                }
            }
        }

        Ok(())
    }
}
