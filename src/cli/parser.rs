//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cache::KeyPrefix;
use crate::namespaces::UserContent;

/// Maintenance tool for the forum client's disk cache
#[derive(Parser, Debug)]
#[command(name = "forum-cache")]
#[command(about = "Inspect and invalidate the forum client's disk cache")]
#[command(long_about = "
forum-cache inspects and maintains the on-disk cache of decoded forum
responses. Each namespace (Explore, likedForum, User) is a directory of
entry files named by key under the configured cache root.

EXAMPLES:
    # Show entry counts and sizes for every namespace
    forum-cache stats

    # Drop every cached personalized page
    forum-cache purge --namespace Explore --prefix p_

    # Drop all cached profile pages of one user
    forum-cache purge-user --uid 42

    # Remove users whose profile cache has gone stale
    forum-cache sweep

    # Validate configuration and show the resolved layout
    forum-cache --env production check
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered configuration
    /// directory. Environment variable overrides still apply.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show entry count and total size per namespace
    Stats {
        /// Only report this namespace
        #[arg(short, long, value_name = "NAME")]
        namespace: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every entry of a namespace whose key starts with a prefix
    ///
    /// Examples:
    ///   forum-cache purge --namespace Explore --prefix hot_
    ///   forum-cache purge --namespace User --prefix 42_t_
    Purge {
        /// Namespace directory name
        #[arg(short, long, value_name = "NAME")]
        namespace: String,

        /// Key prefix of the group to delete
        #[arg(short, long, value_name = "PREFIX", value_parser = super::validation::validate_prefix)]
        prefix: KeyPrefix,
    },
    /// Delete the cached profile pages of one user
    PurgeUser {
        /// User id
        #[arg(long, value_name = "UID", value_parser = super::validation::validate_uid)]
        uid: i64,

        /// Only delete threads or only replies
        #[arg(long, value_enum)]
        content: Option<ContentKind>,
    },
    /// Delete all profile pages of every user with an expired or empty page
    Sweep,
    /// Validate configuration and print the resolved cache layout
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Profile list selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    #[value(name = "threads", alias = "t")]
    Threads,
    #[value(name = "posts", alias = "p")]
    Posts,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}

impl From<ContentKind> for UserContent {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Threads => UserContent::Threads,
            ContentKind::Posts => UserContent::Posts,
        }
    }
}
