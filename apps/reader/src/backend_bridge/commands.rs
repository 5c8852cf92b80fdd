//! Backend commands queued from the UI loop to the backend worker.

use client_core::SyncOptions;
use url::Url;

/// Where a sync reads its posts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Remote(Url),
    /// The posts bundled with the reader; no network access.
    Bundled,
}

#[derive(Debug)]
pub enum BackendCommand {
    StartSync {
        target: SyncTarget,
        options: SyncOptions,
    },
    Shutdown,
}
