//! Typed caches for each client namespace.
//!
//! Each facade owns one [`CacheStore`] and knows the key layout, payload
//! type and expiry rules of its namespace.

mod explore;
mod liked_forum;
mod user_profile;

use std::collections::HashSet;
use std::sync::Arc;

pub use explore::ExploreCache;
pub use liked_forum::LikedForumCache;
pub use user_profile::{UserContent, UserProfileCache};

use crate::cache::{CacheStore, Clock, KeyError};
use crate::config::CacheSettings;

/// All namespace caches under one root directory.
#[derive(Debug, Clone)]
pub struct ForumCaches {
    pub explore: ExploreCache,
    pub liked_forum: LikedForumCache,
    pub user_profile: UserProfileCache,
}

impl ForumCaches {
    /// Build the three stores under `settings.root_dir`.
    ///
    /// Each namespace must have its own directory, since one gate guards
    /// one directory.
    pub fn from_settings(settings: &CacheSettings) -> Result<Self, KeyError> {
        let mut seen = HashSet::new();
        for namespace in settings.namespaces() {
            if !seen.insert(namespace) {
                return Err(KeyError::DuplicateNamespace(namespace.to_string()));
            }
        }

        let root = settings.root();
        Ok(Self {
            explore: ExploreCache::new(&root, &settings.explore)?,
            liked_forum: LikedForumCache::new(&root, &settings.liked_forum)?,
            user_profile: UserProfileCache::new(&root, &settings.user_profile)?,
        })
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            explore: self.explore.with_clock(clock.clone()),
            liked_forum: self.liked_forum.with_clock(clock.clone()),
            user_profile: self.user_profile.with_clock(clock),
        }
    }

    pub fn stores(&self) -> [&CacheStore; 3] {
        [
            self.explore.store(),
            self.liked_forum.store(),
            self.user_profile.store(),
        ]
    }

    /// Store of the namespace with directory name `name`.
    pub fn store(&self, name: &str) -> Option<&CacheStore> {
        self.stores()
            .into_iter()
            .find(|store| store.namespace() == name)
    }
}
