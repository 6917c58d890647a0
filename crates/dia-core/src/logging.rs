//! Log initialization.
//!
//! Logs go to a daily-rolling file under ${DIA_HOME}/logs, never to the
//! terminal: both the TUI and the one-shot commands own their output streams.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, paths};

/// Initializes the global tracing subscriber.
///
/// Filter precedence: RUST_LOG env var, then `log_filter` from config.
/// Returns the appender guard; dropping it flushes and stops the writer,
/// so the caller must hold it for the lifetime of the program.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let logs_dir = paths::logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let appender = tracing_appender::rolling::daily(&logs_dir, "dia.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    // try_init: tests and repeated calls must not panic on double-init
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    Ok(guard)
}
