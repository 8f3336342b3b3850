//! Logging Infrastructure
//!
//! Console logging by default; a daily rolling file when a log directory is
//! configured and present. `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "flooring-mastery";

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir.filter(|dir| dir.is_dir()) {
        let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        return subscriber
            .with_ansi(false)
            .with_writer(file_appender)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e));
    }

    subscriber
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
