//! Cache key construction.
//!
//! Keys double as file names inside a namespace directory, and prefixes are
//! the unit of bulk invalidation, so both are validated up front: a key can
//! never escape its directory or collide with the store's temp files.

use std::fmt;

use crate::cache::error::KeyError;

/// File name prefix reserved for in-flight writes.
pub(crate) const TEMP_FILE_PREFIX: &str = ".tmp-";

/// Validated name of one cache entry within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Result<Self, KeyError> {
        let key = key.into();
        validate_component(&key)?;
        Ok(Self(key))
    }

    /// Key of a per-user entry: the decimal user id.
    pub fn uid(uid: i64) -> Result<Self, KeyError> {
        let uid = require_uid(uid)?;
        Ok(Self(uid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &KeyPrefix) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated key prefix naming a group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(prefix: impl Into<String>) -> Result<Self, KeyError> {
        let prefix = prefix.into();
        validate_component(&prefix)?;
        Ok(Self(prefix))
    }

    /// Prefix shared by every entry of one user: `"<uid>_"`.
    pub fn user(uid: i64) -> Result<Self, KeyError> {
        let uid = require_uid(uid)?;
        Ok(Self(format!("{}_", uid)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `suffix` to this prefix.
    pub fn key(&self, suffix: impl fmt::Display) -> Result<CacheKey, KeyError> {
        CacheKey::new(format!("{}{}", self.0, suffix))
    }

    /// Key of page `page` in a paginated group, e.g. `p_3`.
    ///
    /// Pages below `first_page` are rejected.
    pub fn page(&self, page: i64, first_page: i64) -> Result<CacheKey, KeyError> {
        if page < first_page {
            return Err(KeyError::InvalidPage(page));
        }
        self.key(page)
    }

    /// Extend this prefix, e.g. `"42_"` + `"t_"`.
    pub fn child(&self, segment: &str) -> Result<KeyPrefix, KeyError> {
        KeyPrefix::new(format!("{}{}", self.0, segment))
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject user ids that cannot belong to a signed-in account.
pub fn require_uid(uid: i64) -> Result<i64, KeyError> {
    if uid <= 0 {
        return Err(KeyError::NonPositiveUid(uid));
    }
    Ok(uid)
}

pub(crate) fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_FILE_PREFIX)
}

fn validate_component(value: &str) -> Result<(), KeyError> {
    if value.is_empty() {
        return Err(KeyError::Empty);
    }
    if value.starts_with('.') {
        return Err(KeyError::Reserved(value.to_string()));
    }
    if value
        .chars()
        .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    {
        return Err(KeyError::InvalidCharacter(value.to_string()));
    }
    Ok(())
}
