//! Sync Errors
//!
//! Failure taxonomy shared by the service client and the controller.

use crate::models::TaskId;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Transport failure, non-success status, or an undecodable body.
    #[error("network error: {0}")]
    Network(String),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another mutation for the same task is still in flight.
    #[error("a mutation for task {0} is already in flight")]
    ConcurrentMutation(TaskId),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("task collection is not loaded yet")]
    NotReady,

    /// The owning view was torn down before the result arrived.
    #[error("view detached, result discarded")]
    Detached,
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err.to_string())
    }
}
