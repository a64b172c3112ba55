//! `likedForum` namespace: the forums each user follows, one entry per user.

use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheKey, CacheStore, Clock, KeyError};
use crate::config::LikedForumCacheConfig;
use crate::models::LikeForum;

#[derive(Debug, Clone)]
pub struct LikedForumCache {
    store: CacheStore,
    config: LikedForumCacheConfig,
}

impl LikedForumCache {
    pub fn new(root: impl AsRef<Path>, config: &LikedForumCacheConfig) -> Result<Self, KeyError> {
        Ok(Self {
            store: CacheStore::new(root, config.namespace.as_str())?,
            config: config.clone(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.store = self.store.with_clock(clock);
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Followed forums of `uid`, or `None` if absent or expired.
    pub async fn load(&self, uid: i64) -> Result<Option<Vec<LikeForum>>, KeyError> {
        let key = CacheKey::uid(uid)?;
        Ok(self.store.load_list(&key, Some(self.config.max_age())).await)
    }

    /// Store the followed forums of `uid`, shrunk to what the home page shows.
    pub async fn save(&self, uid: i64, forums: Vec<LikeForum>) -> Result<bool, KeyError> {
        let key = CacheKey::uid(uid)?;
        let forums: Vec<LikeForum> = forums.into_iter().map(LikeForum::shrink).collect();
        Ok(self.store.save_list(&key, &forums).await)
    }

    pub async fn delete(&self, uid: i64) -> Result<(), KeyError> {
        let key = CacheKey::uid(uid)?;
        self.store.purge(&key).await;
        Ok(())
    }
}
