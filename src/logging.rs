use anyhow::{Context, Result};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

pub const LOG_PREFIX: &str = "tally";
const DEFAULT_LEVEL: &str = "info";

/// Pick the log level: explicit flag, then config, then RUST_LOG, then info
pub fn resolve_level(flag: Option<LevelFilter>, configured: Option<&str>) -> String {
    flag.map(|level| level.to_string().to_lowercase())
        .or_else(|| configured.map(str::to_string))
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Turn a level into a filter scoped to this crate. Values that are already
/// filter directives (`tally=debug`, `warn,tally=trace`) pass through.
pub fn filter_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Send tracing output to a daily log file under `<data dir>/logs`.
/// Nothing goes to stdout; the TUI owns the terminal.
pub fn enable_logging(data_dir: &Path, level: &str) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(data_dir.join("logs"))
        .context("Failed to create log file appender")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter_directives(level)))
        .with_ansi(false)
        .with_writer(appender)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;
    Ok(())
}
