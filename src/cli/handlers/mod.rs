//! Command handlers for CLI operations
//!
//! This module contains handlers for each maintenance command, separating
//! command execution from parsing and validation.

pub mod check;
pub mod purge;
pub mod stats;
pub mod sweep;

pub use check::CheckCommandHandler;
pub use purge::PurgeCommandHandler;
pub use stats::StatsCommandHandler;
pub use sweep::SweepCommandHandler;

use crate::config::Settings;
use crate::error::AppResult;
use crate::namespaces::ForumCaches;

fn open_caches(settings: &Settings) -> AppResult<ForumCaches> {
    Ok(ForumCaches::from_settings(&settings.cache)?)
}
