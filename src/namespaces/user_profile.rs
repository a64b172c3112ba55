//! `User` namespace: threads and replies listed on user profiles.
//!
//! Keys are `<uid>_t_<page>` for threads and `<uid>_p_<page>` for replies.
//! Only page 1 expires; deeper pages are kept until purged.

use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheKey, CacheStore, Clock, KeyError, KeyPrefix};
use crate::config::UserProfileCacheConfig;
use crate::models::PostInfo;

/// Profile pages start at 0; page 1 is the one refreshed on every visit.
const FIRST_PAGE: i64 = 0;
const EXPIRING_PAGE: i64 = 1;

/// Which list of a user's profile an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserContent {
    Threads,
    Posts,
}

impl UserContent {
    fn segment(self) -> &'static str {
        match self {
            UserContent::Threads => "t_",
            UserContent::Posts => "p_",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserProfileCache {
    store: CacheStore,
    config: UserProfileCacheConfig,
}

impl UserProfileCache {
    pub fn new(root: impl AsRef<Path>, config: &UserProfileCacheConfig) -> Result<Self, KeyError> {
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

    pub async fn load(
        &self,
        uid: i64,
        page: i64,
        content: UserContent,
    ) -> Result<Option<Vec<PostInfo>>, KeyError> {
        let key = page_key(uid, page, content)?;
        let max_age = (page == EXPIRING_PAGE).then(|| self.config.max_age());
        Ok(self.store.load_list(&key, max_age).await)
    }

    pub async fn save(
        &self,
        uid: i64,
        page: i64,
        content: UserContent,
        posts: &[PostInfo],
    ) -> Result<bool, KeyError> {
        let key = page_key(uid, page, content)?;
        Ok(self.store.save_list(&key, posts).await)
    }

    /// Remove every cached page of `uid`.
    pub async fn purge_by_uid(&self, uid: i64) -> Result<usize, KeyError> {
        let prefix = KeyPrefix::user(uid)?;
        Ok(self.store.purge_all(&prefix).await)
    }

    /// Remove the cached thread or reply pages of `uid`.
    pub async fn purge_content(&self, uid: i64, content: UserContent) -> Result<usize, KeyError> {
        let prefix = KeyPrefix::user(uid)?.child(content.segment())?;
        Ok(self.store.purge_all(&prefix).await)
    }

    /// Remove all pages of every user that owns an expired or empty page.
    pub async fn clean_up_expired(&self) -> usize {
        self.store
            .sweep_expired(self.config.max_age(), uid_of)
            .await
    }
}

fn page_key(uid: i64, page: i64, content: UserContent) -> Result<CacheKey, KeyError> {
    KeyPrefix::user(uid)?
        .child(content.segment())?
        .page(page, FIRST_PAGE)
}

/// `"42_t_1"` -> `"42"`
fn uid_of(name: &str) -> &str {
    name.split_once('_').map_or(name, |(uid, _)| uid)
}
