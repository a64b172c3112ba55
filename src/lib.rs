//! Forum Cache Library
//!
//! Disk cache for decoded forum responses, with the per-feature caches
//! built on top of it and the maintenance command line.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod namespaces;
