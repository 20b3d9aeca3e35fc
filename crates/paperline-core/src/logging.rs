//! Diagnostics go to a daily log file so they never mix with the animated
//! terminal output.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive (e.g. `debug`).
pub const LOG_ENV: &str = "PAPERLINE_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Keeps the background log writer alive; flushes on drop.
#[derive(Debug)]
pub struct LoggingGuard {
    guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn disabled() -> Self {
        Self { guard: None }
    }
}

/// Installs the global subscriber writing to `<logs_dir>/paperline.<date>.log`.
///
/// Logging is best effort: if the directory can't be created or a
/// subscriber is already installed, a disabled guard is returned.
pub fn init(logs_dir: &Path) -> LoggingGuard {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("paperline")
        .filename_suffix("log")
        .build(logs_dir)
    {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!(
                "Warning: failed to open log directory {}: {err}",
                logs_dir.display()
            );
            return LoggingGuard::disabled();
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return LoggingGuard::disabled();
    }

    LoggingGuard {
        guard: Some(guard),
    }
}
