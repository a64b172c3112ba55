//! Cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur inside a cache operation.
///
/// None of these cross the public [`CacheStore`](crate::cache::CacheStore)
/// boundary: `load` turns them into a miss and `save` into `false`.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache IO failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Cache encode failed: {0}")]
    Encode(String),

    #[error("Cache task failed: {0}")]
    Task(String),
}

impl CacheError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors produced while decoding a cache blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("blob is truncated")]
    Truncated,

    #[error("unexpected frame tag: expected {expected}, found {found}")]
    TagMismatch { expected: u32, found: u32 },

    #[error("frame length {0} exceeds the allowed maximum")]
    FrameTooLarge(usize),

    #[error("unexpected trailing bytes after the last frame")]
    TrailingBytes,

    #[error("unknown variant discriminant {0}")]
    UnknownVariant(u8),

    #[error("malformed frame body: {0}")]
    Body(String),
}

/// Invalid key material supplied by a caller.
///
/// These indicate a programming error on the caller side and are reported
/// before any file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("cache key cannot be empty")]
    Empty,

    #[error("cache key '{0}' contains a path separator or control character")]
    InvalidCharacter(String),

    #[error("cache key '{0}' is reserved for temporary files")]
    Reserved(String),

    #[error("invalid user id: {0}")]
    NonPositiveUid(i64),

    #[error("invalid page number: {0}")]
    InvalidPage(i64),

    #[error("namespace '{0}' is configured more than once")]
    DuplicateNamespace(String),
}
