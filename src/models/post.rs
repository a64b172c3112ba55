use serde::{Deserialize, Serialize};

use crate::cache::Payload;

/// A thread or reply listed on a user's profile.
///
/// Threads and replies share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInfo {
    pub thread_id: i64,
    pub post_id: i64,
    pub forum_id: i64,
    pub forum_name: String,
    pub title: String,
    pub content: String,
    pub reply_num: i32,
    pub create_time: i64,
    pub is_thread: bool,
}

impl Payload for PostInfo {}

/// Error body returned by the forum server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFailure {
    pub error_code: i32,
    pub error_msg: String,
}

impl Payload for ServerFailure {}
