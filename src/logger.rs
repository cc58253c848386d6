//! Logging setup.
//!
//! The library only emits `log` records. Binaries decide where they go by
//! installing the dispatch built here from [`LoggingConfig`].

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use log::LevelFilter;

/// Parse a configured level name, case-insensitively.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Build the dispatch for `config`, or `None` when logging is disabled.
pub fn build_dispatch(config: &LoggingConfig) -> Result<Option<fern::Dispatch>> {
    if !config.enabled {
        return Ok(None);
    }

    let level = parse_level(&config.level)
        .with_context(|| format!("Invalid logging level '{}'", config.level))?;

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // sqlx logs every statement at info
        .level_for("sqlx", LevelFilter::Warn);

    let dispatch = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch.chain(file)
        }
        None => dispatch.chain(std::io::stderr()),
    };

    Ok(Some(dispatch))
}

/// Install the global logger. Returns whether one was installed.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    match build_dispatch(config)? {
        Some(dispatch) => {
            dispatch.apply().context("Logger already initialized")?;
            Ok(true)
        }
        None => Ok(false),
    }
}
