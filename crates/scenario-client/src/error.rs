//! Error types for the API client
//!
//! Every failure is surfaced once to the caller; nothing is retried.
//! A failed call must be treated as having had no effect on server state.

/// API client error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Server answered with a non-success HTTP status
    #[error("response status: {status}")]
    Transport { status: u16 },

    /// Body was not the JSON the operation expects
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Connection-level failure (refused, reset, timed out)
    #[error("network error: {0}")]
    Network(String),

    /// Request URL could not be built
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Server reported `success: false` (only from `WriteOutcome::into_result`)
    #[error("{title}: {message}")]
    Rejected { title: String, message: String },
}

impl ApiError {
    /// HTTP status of a transport failure
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request never produced a usable response
    #[inline]
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Malformed(_) | Self::Network(_) | Self::InvalidUrl(_)
        )
    }

    /// Check if the server answered but refused the write
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
