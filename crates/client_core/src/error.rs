use shared::error::{PostListError, SyncFailureKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },
    #[error("response from {endpoint} is not a post list: {reason}")]
    Parse { endpoint: String, reason: String },
    #[error("fetched post list failed validation: {0}")]
    Validation(#[from] PostListError),
    #[error("sync controller was already activated")]
    AlreadyActivated,
}

impl SyncError {
    /// Failure classification for fetch errors; `None` for misuse of the
    /// controller itself.
    pub fn kind(&self) -> Option<SyncFailureKind> {
        match self {
            SyncError::Network { .. } => Some(SyncFailureKind::NetworkFailure),
            SyncError::HttpStatus { .. } => Some(SyncFailureKind::HttpStatusFailure),
            SyncError::Parse { .. } | SyncError::Validation(_) => {
                Some(SyncFailureKind::ParseFailure)
            }
            SyncError::AlreadyActivated => None,
        }
    }
}
