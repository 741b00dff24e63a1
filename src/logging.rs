//! File-based logging with timestamped files and retention cleanup.
//!
//! The loader logs to stderr and, when enabled, to a timestamped file under
//! the configured log directory. Old files are removed past the retention
//! window.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log retention in hours.
pub const DEFAULT_LOG_RETENTION_HOURS: u32 = 24;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log retention period in hours.
    pub retention_hours: u32,
    /// Log level (trace, debug, info, warn, error, off).
    pub level: String,
    /// Whether file logging is enabled.
    pub enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            retention_hours: DEFAULT_LOG_RETENTION_HOURS,
            level: DEFAULT_LOG_LEVEL.to_string(),
            enabled: true,
        }
    }
}

impl LogConfig {
    /// Normalizes a log level string, falling back to the default.
    #[must_use]
    pub fn parse_level(value: &str) -> String {
        match value.to_lowercase().as_str() {
            "trace" => "trace".to_string(),
            "debug" => "debug".to_string(),
            "info" => "info".to_string(),
            "warn" | "warning" => "warn".to_string(),
            "error" => "error".to_string(),
            "off" | "none" | "disabled" => "off".to_string(),
            _ => DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Returns the log file path for a run starting now.
#[must_use]
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let now = chrono::Local::now();
    let filename = format!("cobalt_{}.log", now.format("%Y-%m-%d_%H-%M-%S"));
    log_dir.join(filename)
}

/// Removes log files older than the retention period.
///
/// # Errors
/// Returns error if the directory cannot be read.
pub fn cleanup_old_logs(log_dir: &Path, retention_hours: u32) -> io::Result<u32> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let retention_duration = Duration::from_secs(u64::from(retention_hours) * 3600);
    let now = SystemTime::now();
    let mut deleted_count = 0;

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        // Only process .log files
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        // Check file age
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if let Ok(age) = now.duration_since(modified) {
                    if age > retention_duration && fs::remove_file(&path).is_ok() {
                        deleted_count += 1;
                    }
                }
            }
        }
    }

    Ok(deleted_count)
}

/// Initializes the logging system.
///
/// Installs a stderr layer and, when file logging is enabled, a timestamped
/// file under `log_dir`. Old log files past the retention window are removed
/// first. When the embedding host already installed a subscriber, that one
/// stays in place and the file opened here is removed again.
///
/// # Errors
/// Returns error if the log directory or file cannot be created.
pub fn init(config: &LogConfig, log_dir: &Path) -> io::Result<()> {
    let level = LogConfig::parse_level(&config.level);
    if level == "off" {
        return Ok(());
    }

    let mut log_path = None;
    let mut deleted = 0;
    let file_layer = if config.enabled {
        fs::create_dir_all(log_dir)?;
        deleted = cleanup_old_logs(log_dir, config.retention_hours)?;

        let path = current_log_path(log_dir);
        let log_file = File::create(&path)?;
        log_path = Some(path);

        Some(
            fmt::layer()
                .with_writer(log_file.with_max_level(tracing::Level::TRACE))
                .with_ansi(false)
                .with_target(true),
        )
    } else {
        None
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(true);

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        // Host already installed a subscriber; the fresh file stays unused.
        if let Some(path) = &log_path {
            let _ = fs::remove_file(path);
        }
        return Ok(());
    }

    tracing::info!("Cobalt loader logging initialized");
    if let Some(path) = &log_path {
        tracing::info!("Log file: {}", path.display());
    }
    tracing::info!("Log level: {}", level);
    if deleted > 0 {
        tracing::info!("Cleaned up {} old log file(s)", deleted);
    }

    Ok(())
}
