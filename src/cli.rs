use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::{DebugClient, StepEvent};
use crate::config::{Config, DEFAULT_CONFIG_PATH, DEFAULT_HOST};
use crate::engine::ScriptEngine;
use crate::logging::LogLevel;
use crate::session::{SessionDriver, SessionReport};
use crate::transport::{LoopbackTransport, SocketListener, StreamTransport, TransportKind};

/// linestep - single-stepping script debugger
#[derive(Parser, Debug)]
#[command(name = "lstep")]
#[command(version)]
#[command(about = "Line-by-line script debugger driven over a JSON line protocol")]
#[command(long_about = "linestep (lstep) runs a script one line at a time.

Before each new line it reports {\"type\":\"break\",\"linenumber\":N} and waits for
{\"type\":\"continue\"} from a client. Messages are single-line JSON objects.

Transports:
  stream  client messages on stdin, controller messages on stderr (default)
  socket  serverinit with host/port is printed on stderr, then one client
          connects over TCP and the whole exchange happens on that connection
  none    no client; breaks are printed on stderr and never waited on

Script lines are shell commands. Blank lines and '#' comments are skipped, and
'repeat N: command' runs a command N times on the same line.")]
pub struct Cli {
    /// Path to config file (defaults to .linestep.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Path to the script to debug
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Write a default .linestep.toml config file
    #[arg(long)]
    pub init: bool,

    /// Transport to talk to the client over (overrides config)
    #[arg(short, long, value_enum)]
    pub transport: Option<TransportKind>,

    /// Interface for the socket transport (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Pause in milliseconds after each continue (overrides config)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Shell used to run script lines (overrides config)
    #[arg(long)]
    pub shell: Option<String>,

    /// Log verbosity (overrides config)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Write diagnostic logs to this file; logging is off without it
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Attach to a controller running with --transport socket
    Attach {
        /// Port from the controller's serverinit
        #[arg(long)]
        port: u16,
        /// Host from the controller's serverinit
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Continue automatically instead of waiting for Enter
        #[arg(long)]
        auto: bool,
    },
}

impl Cli {
    /// Apply command line flags on top of file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = Some(delay_ms);
        }
        if let Some(shell) = &self.shell {
            config.shell = shell.clone();
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        if let Some(file) = &self.log_file {
            config.log.file = Some(file.clone());
        }
    }

    /// The script to debug; required unless running a subcommand or --init.
    /// Whether it exists is checked by the session once a client is attached.
    pub fn target(&self) -> anyhow::Result<&Path> {
        self.file
            .as_deref()
            .ok_or_else(|| anyhow!("No script given. Usage: lstep --file <FILE>"))
    }
}

/// Initialize a new config file with default settings
pub fn init_config(config_path: &str) -> anyhow::Result<()> {
    if Path::new(config_path).exists() {
        println!("Config file '{}' already exists.", config_path);
        return Ok(());
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write config to '{}'", config_path))?;

    // Append commented-out optional settings
    use std::fs::OpenOptions;
    use std::io::Write;
    let mut file = OpenOptions::new()
        .append(true)
        .open(config_path)
        .with_context(|| format!("Failed to append to '{}'", config_path))?;
    writeln!(file, "\n# Pause after each continue, in milliseconds")?;
    writeln!(file, "# delay_ms = 60")?;

    println!("Created {}", config_path);
    Ok(())
}

/// Run one debug session to completion on the current thread.
///
/// Blocks for the whole run: in socket mode until a client connects, and at
/// every break until the client continues.
pub fn run_session(config: &Config, target: &Path) -> anyhow::Result<SessionReport> {
    let mut engine = ScriptEngine::new(config.shell.clone());
    let driver = SessionDriver::new(config.session_options());

    let report = match config.transport {
        TransportKind::Stream => driver.run(&mut engine, StreamTransport::stdio(), target)?,
        TransportKind::Socket => {
            let listener = SocketListener::bind(&config.host)
                .with_context(|| format!("Failed to listen on '{}'", config.host))?;
            listener.announce(&mut io::stderr())?;
            tracing::info!(port = listener.port(), "waiting for client");

            let transport = listener.accept()?;
            driver.run(&mut engine, transport, target)?
        }
        TransportKind::None => {
            driver.run(&mut engine, LoopbackTransport::new(io::stderr()), target)?
        }
    };

    Ok(report)
}

/// Play the client side against a socket controller from the terminal
pub async fn attach(host: &str, port: u16, auto: bool) -> anyhow::Result<()> {
    let mut client = DebugClient::connect(host, port)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
    client.handshake().await?;

    let mut stdin = BufReader::new(tokio::io::stdin());

    loop {
        match client.next_event().await? {
            StepEvent::Break(line) => {
                println!("break at line {}", line);
                if !auto {
                    let mut input = String::new();
                    if stdin.read_line(&mut input).await? == 0 {
                        anyhow::bail!("stdin closed while stopped at line {}", line);
                    }
                }
                client.resume().await?;
            }
            StepEvent::Finished => {
                println!("finished");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
