//! Purge command handlers
//!
//! `purge` removes a prefix group from any namespace; `purge-user` removes
//! the profile pages of one user.

use crate::cache::KeyPrefix;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::namespaces::UserContent;

/// Handler for the purge and purge-user commands
pub struct PurgeCommandHandler {
    config: Settings,
}

impl PurgeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, namespace: &str, prefix: &KeyPrefix) -> AppResult<usize> {
        let caches = super::open_caches(&self.config)?;
        let store = caches
            .store(namespace)
            .ok_or_else(|| AppError::UnknownNamespace {
                name: namespace.to_string(),
                known: self.config.cache.namespaces().join(", "),
            })?;

        let deleted = store.purge_all(prefix).await;
        println!("Deleted {} entries with prefix '{}' from {}", deleted, prefix, namespace);
        Ok(deleted)
    }

    pub async fn execute_user(&self, uid: i64, content: Option<UserContent>) -> AppResult<usize> {
        let caches = super::open_caches(&self.config)?;
        let deleted = match content {
            Some(content) => caches.user_profile.purge_content(uid, content).await?,
            None => caches.user_profile.purge_by_uid(uid).await?,
        };
        println!("Deleted {} profile entries of user {}", deleted, uid);
        Ok(deleted)
    }
}
