//! Thread feed payloads for the explore pages.

use serde::{Deserialize, Serialize};

use crate::cache::Payload;

/// One thread as shown in a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: i64,
    pub forum_id: i64,
    pub forum_name: String,
    pub title: String,
    pub author_name: String,
    pub abstract_text: String,
    pub reply_num: i32,
    pub agree_num: i32,
    /// Creation time, unix seconds.
    pub create_time: i64,
    pub media: Vec<String>,
}

impl Payload for ThreadSummary {}

/// Hot threads of one tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotThreadList {
    pub tab_code: String,
    pub threads: Vec<ThreadSummary>,
    pub topics: Vec<String>,
}

impl Payload for HotThreadList {}

/// One page of the personalized feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedPage {
    pub page: i64,
    pub has_more: bool,
    pub threads: Vec<ThreadSummary>,
}

impl Payload for PersonalizedPage {}

/// First page of threads from the forums a user follows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLikePage {
    /// Server-side time of the request that produced this page, unix seconds.
    pub request_unix: i64,
    pub page_tag: String,
    pub has_more: bool,
    pub threads: Vec<ThreadSummary>,
}

impl Payload for UserLikePage {}
