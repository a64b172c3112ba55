//! Payload models persisted by the namespace caches.
//!
//! These mirror the subset of the forum API responses the client keeps on
//! disk. They are plain serde structs; the cache encodes them with the
//! framed binary codec.

mod forum;
mod post;
mod thread;

pub use forum::{ForumTab, LikeForum, PrivateForumInfo, ThemeColor};
pub use post::{PostInfo, ServerFailure};
pub use thread::{HotThreadList, PersonalizedPage, ThreadSummary, UserLikePage};
