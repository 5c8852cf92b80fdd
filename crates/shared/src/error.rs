use thiserror::Error;

use crate::domain::PostId;

/// A post list that breaks the invariants held lists are expected to keep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostListError {
    #[error("post id {id} appears more than once")]
    DuplicateId { id: PostId },
    #[error("post {id} has an unparseable date '{date}'")]
    InvalidDate { id: PostId, date: String },
}

/// Coarse classification of why a sync produced no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFailureKind {
    /// Connection, DNS, TLS or timeout failures.
    NetworkFailure,
    /// The endpoint answered with a non-2xx status.
    HttpStatusFailure,
    /// Malformed JSON, a body that is not a post array, or a list that failed
    /// validation.
    ParseFailure,
}

impl SyncFailureKind {
    pub fn label(self) -> &'static str {
        match self {
            SyncFailureKind::NetworkFailure => "network",
            SyncFailureKind::HttpStatusFailure => "http_status",
            SyncFailureKind::ParseFailure => "parse",
        }
    }
}
