//! Configuration validation logic
//!
//! Validation methods for the configuration structures, run after loading
//! and again after command line overrides are applied.

use std::collections::HashSet;

use crate::cache::CacheKey;
use crate::config::error::ConfigError;
use crate::config::settings::{CacheSettings, FileSettings, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Level must be one of trace, debug, info, warn, error
    /// - File settings must be valid
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl CacheSettings {
    /// Validate the cache layout
    ///
    /// # Validation Rules
    /// - Root directory must not be empty
    /// - Namespace names must be usable as a single directory name
    /// - Namespace names must be distinct
    /// - Every maximum age must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_dir.trim().is_empty() {
            return Err(ConfigError::validation(
                "cache.root_dir",
                "Cache root directory is required.",
            ));
        }

        let namespaces = [
            ("cache.explore.namespace", &self.explore.namespace),
            ("cache.liked_forum.namespace", &self.liked_forum.namespace),
            ("cache.user_profile.namespace", &self.user_profile.namespace),
        ];

        let mut seen = HashSet::new();
        for (field, namespace) in namespaces {
            CacheKey::new(namespace.as_str()).map_err(|e| {
                ConfigError::validation(field, format!("Invalid namespace '{}': {}", namespace, e))
            })?;
            if !seen.insert(namespace.as_str()) {
                return Err(ConfigError::validation(
                    field,
                    format!("Namespace '{}' is used more than once.", namespace),
                ));
            }
        }

        let max_ages = [
            ("cache.explore.hot_threads_max_age", self.explore.hot_threads_max_age),
            ("cache.explore.personalized_max_age", self.explore.personalized_max_age),
            ("cache.explore.user_like_max_age", self.explore.user_like_max_age),
            ("cache.liked_forum.max_age", self.liked_forum.max_age),
            ("cache.user_profile.max_age", self.user_profile.max_age),
        ];
        for (field, max_age) in max_ages {
            if max_age == 0 {
                return Err(ConfigError::validation(
                    field,
                    "Maximum age must be greater than 0 seconds.",
                ));
            }
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}
