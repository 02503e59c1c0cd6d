//! Logging Infrastructure
//!
//! `RUST_LOG` overrides the default filter. Output is JSON unless
//! `LOG_FORMAT=pretty`; with `LOG_DIR` set it goes to a daily rolling file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

const DEFAULT_FILTER: &str = "shield_server=info,tower_http=info";

/// Initialize the global subscriber.
///
/// The returned guard flushes the file writer; keep it alive until shutdown.
pub fn init_logger(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    if let Some(dir) = config.log_dir.as_deref() {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "shield-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let builder = builder.with_writer(writer).with_ansi(false);
            match config.log_format {
                LogFormat::Json => builder.json().init(),
                LogFormat::Pretty => builder.init(),
            }
            return Some(guard);
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    None
}
