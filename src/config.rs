use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::engine::script::DEFAULT_SHELL;
use crate::logging::LogConfig;
use crate::session::SessionOptions;
use crate::transport::TransportKind;

pub const DEFAULT_CONFIG_PATH: &str = ".linestep.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportKind,
    /// Interface the socket transport listens on
    #[serde(default = "default_host")]
    pub host: String,
    /// Pause after each continue, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            host: default_host(),
            delay_ms: None,
            shell: default_shell(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            delay: self.delay(),
        }
    }
}
