//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::writer::LogFileWriter;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;

mod config_tests {
    use super::*;

    fn create_test_config() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: false,
            },
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_path_required_when_enabled() {
        let mut config = create_test_config();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Full);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Compact.as_str(), "compact");
    }

    #[test]
    fn test_verbosity_overrides_level() {
        let config = create_test_config().with_verbosity(true, false);
        assert_eq!(config.level, "debug");

        let config = create_test_config().with_verbosity(false, true);
        assert_eq!(config.level, "error");

        let config = create_test_config().with_verbosity(false, false);
        assert_eq!(config.level, "info");
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_valid_configs_validate(
            console_enabled in any::<bool>(),
            file_enabled in any::<bool>(),
            colored in any::<bool>(),
            append in any::<bool>(),
            level in prop_oneof![
                Just("trace"), Just("debug"), Just("INFO"), Just("Warn"), Just("error")
            ],
        ) {
            prop_assume!(console_enabled || file_enabled);

            let config = LoggerConfig {
                console: ConsoleConfig::new(console_enabled, colored),
                file: FileConfig {
                    enabled: file_enabled,
                    path: PathBuf::from("test.log"),
                    append,
                    format: LogFormat::Json,
                },
                level: level.to_string(),
            };

            prop_assert!(config.validate().is_ok());
            prop_assert!(config.parse_level().is_ok());
        }

        #[test]
        fn property_invalid_levels_fail(level in "[a-z]{6,12}") {
            prop_assume!(!["trace", "debug", "info", "warn", "error"].contains(&level.as_str()));
            let config = LoggerConfig {
                level,
                ..LoggerConfig::default()
            };
            prop_assert!(config.validate().is_err());
        }
    }
}

mod writer_tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(path: PathBuf, append: bool) -> FileConfig {
        FileConfig::new(true, path, append, LogFormat::Compact).unwrap()
    }

    #[test]
    fn test_writer_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("cache.log");

        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.make_writer().write_all(b"hello\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_writer_append_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.log");
        std::fs::write(&path, "first\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), true)).unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_writer_truncate_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.log");
        std::fs::write(&path, "stale\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), false)).unwrap();
        writer.make_writer().write_all(b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}

mod subscriber_tests {
    use super::*;
    use crate::logger::{both_subscriber, file_only_subscriber};
    use tempfile::TempDir;
    use tracing_subscriber::EnvFilter;

    const FORMATS: [LogFormat; 3] = [LogFormat::Full, LogFormat::Compact, LogFormat::Json];

    fn logger_config(path: PathBuf, format: LogFormat) -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::new(true, true),
            file: FileConfig::new(true, path, false, format).unwrap(),
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_console_and_file_subscriber_for_every_format() {
        for format in FORMATS {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("both.log");
            let config = logger_config(path.clone(), format);

            let subscriber = both_subscriber(&config, EnvFilter::new("info")).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(namespace = "User", deleted = 3, "Swept expired cache groups");
                tracing::debug!("filtered out");
            });

            let contents = std::fs::read_to_string(&path).unwrap();
            assert!(contents.contains("Swept expired cache groups"), "{:?}: {}", format, contents);
            assert!(!contents.contains("filtered out"), "{:?}", format);
            assert!(!contents.contains('\x1b'), "{:?} file output has ANSI codes", format);
        }
    }

    #[test]
    fn test_file_only_subscriber_for_every_format() {
        for format in FORMATS {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("file.log");
            let config = FileConfig::new(true, path.clone(), false, format).unwrap();

            let subscriber = file_only_subscriber(&config, EnvFilter::new("info")).unwrap();
            tracing::subscriber::with_default(subscriber, || {
                tracing::warn!(key = "p_1", "Unable to write cache entry");
            });

            let contents = std::fs::read_to_string(&path).unwrap();
            assert!(contents.contains("Unable to write cache entry"), "{:?}", format);
        }
    }

    #[test]
    fn test_json_file_lines_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("json.log");
        let config = FileConfig::new(true, path.clone(), false, LogFormat::Json).unwrap();

        let subscriber = file_only_subscriber(&config, EnvFilter::new("info")).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(deleted = 2, "Purged cache entries by prefix");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(line["fields"]["message"], "Purged cache entries by prefix");
        assert_eq!(line["fields"]["deleted"], 2);
    }
}
