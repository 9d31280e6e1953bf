//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to a
//! file when one is given and nowhere otherwise.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::error::LogError;

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Discard,
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_tracing(level: &str, target: LogTarget<'_>) -> Result<Option<WorkerGuard>, LogError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| LogError::InvalidFilter {
            filter: level.to_string(),
            reason: e.to_string(),
        })?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
            Ok(None)
        }
        LogTarget::Discard => {
            builder
                .with_writer(std::io::sink)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let file_err = |reason: String| LogError::File { path: path.to_path_buf(), reason };
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| file_err("not a file name".to_string()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name)
                .build(dir)
                .map_err(|e| file_err(e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| LogError::Init(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}
