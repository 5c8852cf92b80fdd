//! Post list state and the one-shot sync that fills it.

pub mod error;
mod seed;
pub mod source;
pub mod store;
pub mod sync;

pub use error::SyncError;
pub use seed::seed_posts;
pub use source::{HttpPostSource, PostSource, StaticPostSource};
pub use store::{ContentStore, SharedContentStore, WeakContentStore};
pub use sync::{DiscardReason, SyncController, SyncEvent, SyncHandle, SyncOptions, SyncState};
