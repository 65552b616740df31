use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::LoggingConfig;

const LOG_FILE_PREFIX: &str = "hookguard";

pub struct FileLogger {
    log_directory: PathBuf,
    max_files: usize,
    rotation: Rotation,
}

impl FileLogger {
    pub fn new(log_directory: PathBuf) -> Self {
        Self {
            log_directory,
            max_files: 5,
            rotation: Rotation::DAILY,
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Non-blocking writer over a rolling file appender.
    /// The guard must be held for as long as logs should be flushed.
    pub fn setup_file_logging(&self) -> Result<(NonBlocking, WorkerGuard), InitError> {
        let file_appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(LOG_FILE_PREFIX)
            .max_log_files(self.max_files)
            .build(&self.log_directory)?;

        Ok(tracing_appender::non_blocking(file_appender))
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber: console output, plus rolling files when a
/// log directory is configured.
pub fn setup_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_logger =
                FileLogger::new(directory.clone()).with_max_files(config.get_max_files());
            match file_logger.setup_file_logging() {
                Ok((writer, guard)) => (
                    Some(
                        tracing_subscriber::fmt::layer()
                            .with_writer(writer)
                            .with_ansi(false),
                    ),
                    Some(guard),
                ),
                Err(e) => {
                    eprintln!(
                        "Failed to open log directory {}: {}; logging to console only",
                        directory.display(),
                        e
                    );
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer()) // Console output
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logger_creates_appender() {
        let dir = std::env::temp_dir().join(format!("hookguard-logs-{}", std::process::id()));
        let logger = FileLogger::new(dir.clone())
            .with_max_files(2)
            .with_rotation(Rotation::NEVER);

        let (_writer, guard) = logger.setup_file_logging().unwrap();
        drop(guard);
        assert!(dir.exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
