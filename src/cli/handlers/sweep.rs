//! Sweep command handler

use crate::config::Settings;
use crate::error::AppResult;

/// Handler for the sweep command
pub struct SweepCommandHandler {
    config: Settings,
}

impl SweepCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<usize> {
        let caches = super::open_caches(&self.config)?;
        let deleted = caches.user_profile.clean_up_expired().await;
        println!(
            "Deleted {} expired profile entries from {}",
            deleted,
            caches.user_profile.store().dir().display()
        );
        Ok(deleted)
    }
}
