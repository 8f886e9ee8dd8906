use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global subscriber writing to a daily-rotated file.
///
/// The terminal belongs to the console UI, so nothing is written to stdout.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dutylog")
        .filename_suffix("log")
        .build(&config.directory)?;

    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| config.filter.clone());
    let filter = EnvFilter::try_new(directives)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_level(true)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
