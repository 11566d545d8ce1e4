//! Session error types

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors surfaced by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// The operation needs a credential and none is held
    #[error("Not logged in")]
    NotAuthenticated,

    /// The remote call failed; session state was left untouched
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The in-memory state changed but could not be persisted
    #[error("Could not persist session: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
