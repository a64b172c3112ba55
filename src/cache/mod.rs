//! Local disk cache for decoded network payloads.
//!
//! Each namespace owns one directory under the cache root. Every entry is a
//! single file named by its key, holding the framed binary encoding of a
//! payload value or list of values. Freshness is judged from the file's
//! modification time, so nothing about expiry is stored in the payload.
//!
//! ```text
//! <root>/
//!   Explore/      hot_all, p_1, p_2, concern_42
//!   likedForum/   12345
//!   User/         42_t_1, 42_p_0
//! ```
//!
//! # Failure model
//!
//! The cache never fails its caller. A missing, expired, unreadable or
//! corrupt entry is a miss; a failed write returns `false` and leaves any
//! previous entry untouched.
//!
//! # Usage
//!
//! ```ignore
//! let store = CacheStore::new(&settings.cache.root_dir, "Explore")?;
//! let key = KeyPrefix::new("hot_")?.key("all")?;
//! if store.load::<HotThreadList>(&key, Some(Duration::from_secs(3600))).await.is_none() {
//!     store.save(&key, &fetched).await;
//! }
//! ```

mod clock;
pub mod codec;
mod error;
mod expiry;
mod gate;
mod naming;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{Outcome, OutcomeKind, Payload};
pub use error::{CacheError, DecodeError, KeyError};
pub use expiry::is_expired;
pub use gate::Gate;
pub use naming::{CacheKey, KeyPrefix, require_uid};
pub use store::{CacheStore, CachedEntry, NamespaceStats};
