//! Structured logging for the feed.
//!
//! Dual output: a non-blocking file appender plus stdout, filtered by
//! `RUST_LOG` (default `info`). The file is truncated at session start
//! so each run reads top-to-bottom.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the file writer alive; dropping it flushes and closes the log.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Default log location, `<data dir>/skyfeed/skyfeed.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyfeed")
        .join("skyfeed.log")
}

/// Install the global subscriber with file and stdout layers.
///
/// Creates the log directory if needed and truncates any previous log
/// file. Errors when the directory cannot be created or the file cannot
/// be truncated.
pub fn init_logging(log_path: &Path) -> Result<LoggingGuard, io::Error> {
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_file = log_path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;

    fs::create_dir_all(log_dir)?;
    fs::write(log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_shape() {
        let path = default_log_path();
        assert!(path.ends_with("skyfeed/skyfeed.log"));
    }

    #[test]
    fn test_truncates_previous_log() {
        // init_logging itself can only run once per process (global
        // subscriber), so exercise the file handling it relies on.
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("skyfeed.log");
        fs::write(&log_path, "stale run output").unwrap();

        fs::create_dir_all(log_path.parent().unwrap()).unwrap();
        fs::write(&log_path, "").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_creates_nested_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("deep").join("nested").join("skyfeed.log");

        fs::create_dir_all(log_path.parent().unwrap()).unwrap();
        fs::write(&log_path, "").unwrap();

        assert!(log_path.exists());
    }
}
