//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{
    CheckCommandHandler, PurgeCommandHandler, StatsCommandHandler, SweepCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli, &settings)?;

    match &cli.command {
        Commands::Stats { namespace, json } => {
            StatsCommandHandler::new(settings)
                .execute(namespace.as_deref(), *json)
                .await
        }
        Commands::Purge { namespace, prefix } => {
            PurgeCommandHandler::new(settings)
                .execute(namespace, prefix)
                .await
                .map(|_| ())
        }
        Commands::PurgeUser { uid, content } => {
            PurgeCommandHandler::new(settings)
                .execute_user(*uid, content.map(Into::into))
                .await
                .map(|_| ())
        }
        Commands::Sweep => SweepCommandHandler::new(settings).execute().await.map(|_| ()),
        Commands::Check => CheckCommandHandler::new(settings).execute().await,
    }
}

/// Validate command arguments against the loaded configuration
fn validate_command_args(cli: &Cli, settings: &Settings) -> AppResult<()> {
    let namespace = match &cli.command {
        Commands::Stats {
            namespace: Some(namespace),
            ..
        } => namespace,
        Commands::Purge { namespace, .. } => namespace,
        _ => return Ok(()),
    };

    let known = settings.cache.namespaces();
    if !known.contains(&namespace.as_str()) {
        return Err(AppError::UnknownNamespace {
            name: namespace.clone(),
            known: known.join(", "),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CacheStore};
    use crate::models::ThreadSummary;
    use clap::Parser;
    use tempfile::TempDir;

    fn create_config(root: &TempDir) -> Settings {
        let mut config = Settings::default();
        config.cache.root_dir = root.path().to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_execute_stats() {
        let root = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["forum-cache", "stats", "--json"]).unwrap();
        assert!(execute_command(&cli, create_config(&root)).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_purge() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path(), "Explore").unwrap();
        let key = CacheKey::new("hot_all").unwrap();
        assert!(store.save_list::<ThreadSummary>(&key, &[]).await);

        let cli =
            Cli::try_parse_from(["forum-cache", "purge", "-n", "Explore", "-p", "hot_"]).unwrap();
        execute_command(&cli, create_config(&root)).await.unwrap();

        assert!(!store.path_for(&key).exists());
    }

    #[tokio::test]
    async fn test_execute_sweep_on_empty_root() {
        let root = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["forum-cache", "sweep"]).unwrap();
        assert!(execute_command(&cli, create_config(&root)).await.is_ok());
    }

    #[test]
    fn test_validate_unknown_namespace() {
        let cli =
            Cli::try_parse_from(["forum-cache", "purge", "-n", "Forums", "-p", "x"]).unwrap();
        match validate_command_args(&cli, &Settings::default()) {
            Err(AppError::UnknownNamespace { name, known }) => {
                assert_eq!(name, "Forums");
                assert_eq!(known, "Explore, likedForum, User");
            }
            other => panic!("Expected UnknownNamespace, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_commands_without_namespace() {
        let cli = Cli::try_parse_from(["forum-cache", "stats"]).unwrap();
        assert!(validate_command_args(&cli, &Settings::default()).is_ok());

        let cli = Cli::try_parse_from(["forum-cache", "check"]).unwrap();
        assert!(validate_command_args(&cli, &Settings::default()).is_ok());
    }
}
