//! CLI module for forum-cache
//!
//! This module provides the maintenance command line:
//! - Argument parsing with clap
//! - Configuration loading with command line overrides
//! - Command handlers for inspecting and invalidating the disk cache

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, ContentKind, Environment};

use crate::config::{ConfigError, ConfigLoader, Settings};
use crate::logger::init_logger;

/// Load configuration and apply command line overrides
///
/// `--config` replaces layered loading with a single file, `--env` replaces
/// `FORUM_CACHE_APP_ENV`, and `--verbose`/`--quiet` adjust the log level.
/// The merged settings are validated again.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut loader = ConfigLoader::new()?;
    if let Some(ref path) = cli.config {
        loader = loader.with_config_file(path);
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }

    let mut settings = loader.load()?;
    apply_overrides(&mut settings, cli);
    settings.validate()?;

    Ok(settings)
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }
}

/// Initialize logger from settings
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)
}
