//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)

pub mod config;
pub mod error;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

/// Initialize the logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = build_filter(&config.level);

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter)?,
        (true, false) => init_console_only(&config.console, filter),
        (false, true) => init_file_only(&config.file, filter)?,
        (false, false) => {
            return Err(
                LoggerError::config("At least one output (console or file) must be enabled").into(),
            );
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) {
    let use_ansi = config.colored && std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true),
        )
        .init();
}

/// Subscriber assembled by the file and console+file setups.
type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> anyhow::Result<()> {
    file_only_subscriber(config, filter)?.init();
    Ok(())
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> anyhow::Result<()> {
    both_subscriber(config, filter)?.init();
    Ok(())
}

fn file_only_subscriber(config: &FileConfig, filter: EnvFilter) -> anyhow::Result<BoxedSubscriber> {
    let writer = LogFileWriter::new(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let subscriber: BoxedSubscriber = match config.format {
        LogFormat::Full => Box::new(
            registry.with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer)),
        ),
        LogFormat::Compact => Box::new(
            registry.with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            ),
        ),
        LogFormat::Json => {
            Box::new(registry.with(fmt::layer().with_ansi(false).json().with_writer(writer)))
        }
    };

    Ok(subscriber)
}

fn both_subscriber(config: &LoggerConfig, filter: EnvFilter) -> anyhow::Result<BoxedSubscriber> {
    let use_ansi = config.console.colored && std::io::stderr().is_terminal();
    let writer = LogFileWriter::new(&config.file)?;

    // The file layer goes first so ANSI codes from the console layer do not
    // leak into span fields written to the file.
    // See: https://github.com/tokio-rs/tracing/issues/1817
    let subscriber: BoxedSubscriber = match config.file.format {
        LogFormat::Full => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);

            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            Box::new(
                tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .with(console_layer),
            )
        }
        LogFormat::Compact => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(writer);

            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            Box::new(
                tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .with(console_layer),
            )
        }
        LogFormat::Json => {
            let file_layer = fmt::layer().with_ansi(false).json().with_writer(writer);

            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            Box::new(
                tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .with(console_layer),
            )
        }
    };

    Ok(subscriber)
}
