//! Session errors

use scenario_client::ApiError;
use scenario_store::StoreError;

/// Failure of a session operation
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Raised before any request is sent
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Check if the operation failed before reaching the server
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// HTTP status, if the server answered with a failure status
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status(),
            Self::Store(_) => None,
        }
    }
}
