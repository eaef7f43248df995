//! Resource store error types.

use thiserror::Error;

use super::state::Operation;
use crate::api::ApiError;
use crate::entities::ResourceKind;

/// Errors returned by store operations.
///
/// The store keeps only the message in its state; callers get the typed error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend call failed.
    #[error("{message}")]
    Request {
        kind: ResourceKind,
        operation: Operation,
        message: String,
        #[source]
        source: ApiError,
    },

    /// The caller cancelled before the result was committed.
    #[error("{operation} {kind} was cancelled")]
    Cancelled {
        kind: ResourceKind,
        operation: Operation,
    },
}

impl StoreError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled { .. })
    }

    /// HTTP status behind the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Request { source, .. } => source.status(),
            StoreError::Cancelled { .. } => None,
        }
    }
}
