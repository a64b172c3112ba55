//! Followed forum payloads for the home page.

use serde::{Deserialize, Serialize};

use crate::cache::Payload;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub day: String,
    pub night: String,
    pub dark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateForumInfo {
    pub status: i32,
    pub total_num: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTab {
    pub tab_id: i32,
    pub tab_name: String,
    pub tab_type: i32,
}

/// A forum the user follows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeForum {
    pub forum_id: i64,
    pub forum_name: String,
    pub avatar: String,
    pub level_id: i32,
    pub level_name: String,
    pub is_sign: bool,
    pub hot_num: i32,
    /// Forum introduction, unused by the home page.
    pub content: String,
    pub theme_color: Option<ThemeColor>,
    pub private_forum_info: Option<PrivateForumInfo>,
    pub tab_info: Vec<ForumTab>,
}

impl Payload for LikeForum {}

impl LikeForum {
    /// Drop the fields the home page never renders.
    pub fn shrink(self) -> Self {
        Self {
            content: String::new(),
            theme_color: None,
            private_forum_info: None,
            tab_info: Vec::new(),
            ..self
        }
    }
}
