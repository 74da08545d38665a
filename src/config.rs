use crate::persistence::config_file;
use crate::ticker::{DEFAULT_POLL_MS, DEFAULT_TICK_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings read from `<data dir>/config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    /// How often the running timer recomputes elapsed time
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How long the event loop waits for a key press
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// e.g. "debug"; falls back to RUST_LOG
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default = "default_use_emoji")]
    pub use_emoji: bool,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_MS
}

fn default_use_emoji() -> bool {
    true
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            log_level: None,
            use_emoji: default_use_emoji(),
        }
    }
}

impl TallyConfig {
    /// Load config from the data directory. Returns default config if the file doesn't exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = config_file(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Write the config unless one already exists
    pub fn write_default(data_dir: &Path) -> Result<()> {
        let path = config_file(data_dir);
        if path.exists() {
            return Ok(());
        }
        let raw = toml::to_string_pretty(&Self::default())?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }
}
