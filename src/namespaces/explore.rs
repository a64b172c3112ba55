//! `Explore` namespace: hot threads, personalized feed and the followed-forum
//! feed.
//!
//! ```text
//! hot_<tab>        HotThreadList     expires
//! p_<page>         PersonalizedPage  only page 1 expires
//! concern_<uid>    UserLikePage      expires, request time always readable
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheKey, CacheStore, Clock, KeyError, KeyPrefix};
use crate::config::ExploreCacheConfig;
use crate::models::{HotThreadList, PersonalizedPage, UserLikePage};

const HOT_PREFIX: &str = "hot_";
const PERSONALIZED_PREFIX: &str = "p_";
const USER_LIKE_PREFIX: &str = "concern_";

/// Personalized pages start at 1.
const FIRST_PERSONALIZED_PAGE: i64 = 1;

#[derive(Debug, Clone)]
pub struct ExploreCache {
    store: CacheStore,
    config: ExploreCacheConfig,
}

impl ExploreCache {
    pub fn new(root: impl AsRef<Path>, config: &ExploreCacheConfig) -> Result<Self, KeyError> {
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

    // ------------------------------------------------------------------------
    // Hot threads
    // ------------------------------------------------------------------------

    pub async fn load_hot_threads(&self, tab_code: &str) -> Result<Option<HotThreadList>, KeyError> {
        let key = hot_key(tab_code)?;
        Ok(self
            .store
            .load(&key, Some(self.config.hot_threads_max_age()))
            .await)
    }

    pub async fn save_hot_threads(&self, tab_code: &str, data: &HotThreadList) -> Result<bool, KeyError> {
        let key = hot_key(tab_code)?;
        Ok(self.store.save(&key, data).await)
    }

    /// Drop the hot thread lists of every tab.
    pub async fn purge_hot_threads(&self) -> usize {
        match KeyPrefix::new(HOT_PREFIX) {
            Ok(prefix) => self.store.purge_all(&prefix).await,
            Err(_) => 0,
        }
    }

    // ------------------------------------------------------------------------
    // Personalized feed
    // ------------------------------------------------------------------------

    /// Cached personalized `page`. Only the first page ever expires.
    pub async fn load_personalized(&self, page: i64) -> Result<Option<PersonalizedPage>, KeyError> {
        let key = personalized_key(page)?;
        let max_age = (page == FIRST_PERSONALIZED_PAGE).then(|| self.config.personalized_max_age());
        Ok(self.store.load(&key, max_age).await)
    }

    pub async fn save_personalized(&self, page: i64, data: &PersonalizedPage) -> Result<bool, KeyError> {
        let key = personalized_key(page)?;
        Ok(self.store.save(&key, data).await)
    }

    pub async fn purge_personalized(&self) -> usize {
        match KeyPrefix::new(PERSONALIZED_PREFIX) {
            Ok(prefix) => self.store.purge_all(&prefix).await,
            Err(_) => 0,
        }
    }

    // ------------------------------------------------------------------------
    // Followed-forum feed
    // ------------------------------------------------------------------------

    /// First followed-forum page of `uid`.
    ///
    /// Returns the unix time of the request that produced the cached page
    /// (0 when nothing is cached) together with the page itself, or `None`
    /// when it has expired. The request time stays readable after expiry so
    /// callers can ask the server for changes since then.
    pub async fn load_user_like(&self, uid: i64) -> Result<(i64, Option<UserLikePage>), KeyError> {
        let key = user_like_key(uid)?;
        let Some(entry) = self.store.load_entry::<UserLikePage>(&key).await else {
            return Ok((0, None));
        };

        let last_request_unix = entry.value.request_unix;
        if entry.is_expired(self.config.user_like_max_age()) {
            debug!(uid, last_request_unix, "Followed-forum page expired");
            return Ok((last_request_unix, None));
        }
        Ok((last_request_unix, Some(entry.value)))
    }

    pub async fn save_user_like(&self, uid: i64, data: &UserLikePage) -> Result<bool, KeyError> {
        let key = user_like_key(uid)?;
        Ok(self.store.save(&key, data).await)
    }

    pub async fn purge_user_like(&self, uid: i64) -> Result<(), KeyError> {
        let key = user_like_key(uid)?;
        self.store.purge(&key).await;
        Ok(())
    }
}

fn hot_key(tab_code: &str) -> Result<CacheKey, KeyError> {
    KeyPrefix::new(HOT_PREFIX)?.key(tab_code)
}

fn personalized_key(page: i64) -> Result<CacheKey, KeyError> {
    KeyPrefix::new(PERSONALIZED_PREFIX)?.page(page, FIRST_PERSONALIZED_PAGE)
}

fn user_like_key(uid: i64) -> Result<CacheKey, KeyError> {
    let uid = crate::cache::require_uid(uid)?;
    KeyPrefix::new(USER_LIKE_PREFIX)?.key(uid)
}
