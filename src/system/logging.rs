//! Logging system initialization
//!
//! This module provides functions to initialize the tracing/logging system
//! based on application configuration.

use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{CrmError, Result};

/// Initialize logging system based on configuration
///
/// Sets up file output, log rotation and formatting according to the
/// `[logging]` section.
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let writer: Box<dyn std::io::Write + Send + Sync> = match config.file.as_deref() {
        Some(log_file) if !log_file.is_empty() && config.enable_rotation => {
            let path = Path::new(log_file);
            let dir = path.parent().unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("crmdesk.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.max_backups as usize)
                .build(dir)
                .map_err(|e| {
                    CrmError::file_operation(format!("Failed to create rolling log appender: {}", e))
                })?;
            Box::new(appender)
        }
        Some(log_file) if !log_file.is_empty() => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            Box::new(file)
        }
        _ => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(config.file.as_ref().is_none_or(|f| f.is_empty()));

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    Ok(guard)
}
