//! Configuration settings structures for forum-cache
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "forum-cache".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/forum-cache.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_cache_root() -> String {
    "cache".to_string()
}

fn default_explore_namespace() -> String {
    "Explore".to_string()
}

fn default_hot_threads_max_age() -> u64 {
    60 * 60 // 1 hour
}

fn default_personalized_max_age() -> u64 {
    24 * 60 * 60 // 1 day
}

fn default_user_like_max_age() -> u64 {
    60 * 60
}

fn default_liked_forum_namespace() -> String {
    "likedForum".to_string()
}

fn default_liked_forum_max_age() -> u64 {
    2 * 24 * 60 * 60 // 2 days
}

fn default_user_profile_namespace() -> String {
    "User".to_string()
}

fn default_user_profile_max_age() -> u64 {
    60 * 60
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to an existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format)
            .map_err(|e| ConfigError::validation("logger.file", e.to_string()))
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// `Explore` namespace: hot threads, personalized feed, followed-forum feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreCacheConfig {
    /// Directory name under the cache root
    #[serde(default = "default_explore_namespace")]
    pub namespace: String,

    /// Maximum age of a hot thread list, in seconds
    #[serde(default = "default_hot_threads_max_age")]
    pub hot_threads_max_age: u64,

    /// Maximum age of the first personalized page, in seconds
    #[serde(default = "default_personalized_max_age")]
    pub personalized_max_age: u64,

    /// Maximum age of the first followed-forum page, in seconds
    #[serde(default = "default_user_like_max_age")]
    pub user_like_max_age: u64,
}

impl Default for ExploreCacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_explore_namespace(),
            hot_threads_max_age: default_hot_threads_max_age(),
            personalized_max_age: default_personalized_max_age(),
            user_like_max_age: default_user_like_max_age(),
        }
    }
}

impl ExploreCacheConfig {
    pub fn hot_threads_max_age(&self) -> Duration {
        Duration::from_secs(self.hot_threads_max_age)
    }

    pub fn personalized_max_age(&self) -> Duration {
        Duration::from_secs(self.personalized_max_age)
    }

    pub fn user_like_max_age(&self) -> Duration {
        Duration::from_secs(self.user_like_max_age)
    }
}

/// `likedForum` namespace: followed forums per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedForumCacheConfig {
    #[serde(default = "default_liked_forum_namespace")]
    pub namespace: String,

    /// Maximum age in seconds
    #[serde(default = "default_liked_forum_max_age")]
    pub max_age: u64,
}

impl Default for LikedForumCacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_liked_forum_namespace(),
            max_age: default_liked_forum_max_age(),
        }
    }
}

impl LikedForumCacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }
}

/// `User` namespace: profile threads and posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileCacheConfig {
    #[serde(default = "default_user_profile_namespace")]
    pub namespace: String,

    /// Maximum age of a first page, in seconds
    #[serde(default = "default_user_profile_max_age")]
    pub max_age: u64,
}

impl Default for UserProfileCacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_user_profile_namespace(),
            max_age: default_user_profile_max_age(),
        }
    }
}

impl UserProfileCacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }
}

/// Disk cache layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory holding one subdirectory per namespace
    #[serde(default = "default_cache_root")]
    pub root_dir: String,

    #[serde(default)]
    pub explore: ExploreCacheConfig,

    #[serde(default)]
    pub liked_forum: LikedForumCacheConfig,

    #[serde(default)]
    pub user_profile: UserProfileCacheConfig,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            root_dir: default_cache_root(),
            explore: ExploreCacheConfig::default(),
            liked_forum: LikedForumCacheConfig::default(),
            user_profile: UserProfileCacheConfig::default(),
        }
    }
}

impl CacheSettings {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// Configured namespace directory names, in a fixed order.
    pub fn namespaces(&self) -> [&str; 3] {
        [
            self.explore.namespace.as_str(),
            self.liked_forum.namespace.as_str(),
            self.user_profile.namespace.as_str(),
        ]
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Arbitrary implementations for property-based testing
    // ========================================================================

    fn arb_application_config() -> impl Strategy<Value = ApplicationConfig> {
        ("[a-z][a-z0-9-]{0,20}", "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}")
            .prop_map(|(name, version)| ApplicationConfig { name, version })
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![
                Just("trace".to_string()),
                Just("debug".to_string()),
                Just("info".to_string()),
                Just("warn".to_string()),
                Just("error".to_string()),
            ],
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            prop_oneof![
                Just("json".to_string()),
                Just("full".to_string()),
                Just("compact".to_string()),
            ],
        )
            .prop_map(
                |(level, console_enabled, colored, file_enabled, append, format)| LoggerSettings {
                    level,
                    console: ConsoleSettings {
                        enabled: console_enabled,
                        colored,
                    },
                    file: FileSettings {
                        enabled: file_enabled,
                        path: default_log_path(),
                        append,
                        format,
                    },
                },
            )
    }

    fn arb_cache_settings() -> impl Strategy<Value = CacheSettings> {
        (
            prop_oneof![
                Just("cache".to_string()),
                Just("/var/cache/forum".to_string()),
                Just("./tmp/cache".to_string()),
            ],
            "[A-Za-z][A-Za-z0-9]{0,12}",
            1u64..=604_800u64,
            1u64..=604_800u64,
            1u64..=604_800u64,
            1u64..=604_800u64,
            1u64..=604_800u64,
        )
            .prop_map(
                |(root_dir, explore, hot, personalized, user_like, liked, profile)| CacheSettings {
                    root_dir,
                    explore: ExploreCacheConfig {
                        namespace: explore,
                        hot_threads_max_age: hot,
                        personalized_max_age: personalized,
                        user_like_max_age: user_like,
                    },
                    liked_forum: LikedForumCacheConfig {
                        namespace: default_liked_forum_namespace(),
                        max_age: liked,
                    },
                    user_profile: UserProfileCacheConfig {
                        namespace: default_user_profile_namespace(),
                        max_age: profile,
                    },
                },
            )
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_application_config(),
            arb_logger_settings(),
            arb_cache_settings(),
        )
            .prop_map(|(application, logger, cache)| Settings {
                application,
                logger,
                cache,
            })
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Serializing any settings to TOML and back yields the same settings.
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    // ========================================================================
    // Unit tests
    // ========================================================================

    #[test]
    fn test_application_config_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.name, "forum-cache");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_cache_settings_defaults() {
        let cache = CacheSettings::default();
        assert_eq!(cache.root_dir, "cache");
        assert_eq!(cache.namespaces(), ["Explore", "likedForum", "User"]);
        assert_eq!(cache.explore.hot_threads_max_age(), Duration::from_secs(3600));
        assert_eq!(cache.explore.personalized_max_age(), Duration::from_secs(86_400));
        assert_eq!(cache.explore.user_like_max_age(), Duration::from_secs(3600));
        assert_eq!(cache.liked_forum.max_age(), Duration::from_secs(172_800));
        assert_eq!(cache.user_profile.max_age(), Duration::from_secs(3600));
    }

    #[test]
    fn test_logger_settings_defaults() {
        let settings = LoggerSettings::default();
        assert_eq!(settings.level, "info");
        assert!(settings.console.enabled);
        assert!(!settings.file.enabled);
        assert_eq!(settings.file.format, "json");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
            [cache]
            root_dir = "/data/cache"

            [cache.liked_forum]
            max_age = 60
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.cache.root_dir, "/data/cache");
        assert_eq!(settings.cache.liked_forum.max_age, 60);
        assert_eq!(settings.cache.liked_forum.namespace, "likedForum");
        assert_eq!(settings.cache.explore, ExploreCacheConfig::default());
        assert_eq!(settings.logger, LoggerSettings::default());
    }

    #[test]
    fn test_logger_settings_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            console: ConsoleSettings {
                enabled: true,
                colored: false,
            },
            file: FileSettings {
                enabled: true,
                path: "logs/test.log".to_string(),
                append: false,
                format: "Compact".to_string(),
            },
        };
        let config = settings.into_logger_config().expect("Should convert");
        assert_eq!(config.level, "debug");
        assert!(!config.console.colored);
        assert!(config.file.enabled);
        assert_eq!(config.file.path, PathBuf::from("logs/test.log"));
        assert_eq!(config.file.format, LogFormat::Compact);
    }

    #[test]
    fn test_file_settings_invalid_format() {
        let settings = FileSettings {
            format: "xml".to_string(),
            ..Default::default()
        };
        match settings.into_file_config() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "logger.file.format")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_logger_settings_both_outputs_disabled() {
        let settings = LoggerSettings {
            console: ConsoleSettings {
                enabled: false,
                colored: false,
            },
            ..Default::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
