//! CLI argument validation functions
//!
//! Custom value parsers for arguments that clap cannot validate on its own.

use std::fs;
use std::path::PathBuf;

use crate::cache::{KeyPrefix, require_uid};

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Validate a user id is a positive number
pub fn validate_uid(uid_str: &str) -> Result<i64, String> {
    let uid: i64 = uid_str
        .parse()
        .map_err(|_| format!("User id must be a number, got: '{}'", uid_str))?;
    require_uid(uid).map_err(|e| e.to_string())
}

/// Validate a key prefix can name a group of cache entries
pub fn validate_prefix(prefix_str: &str) -> Result<KeyPrefix, String> {
    KeyPrefix::new(prefix_str).map_err(|e| e.to_string())
}
