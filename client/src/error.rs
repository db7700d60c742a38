//! Error types for the answer client.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the local answer store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] answer_engine::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the gateway and the sync orchestrator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Credential rejected by the server. The session must sign in again.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network failure, timeout, or unexpected status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a payload of the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("local store error: {0}")]
    Store(#[from] StoreError),

    #[error("a sync is already in progress")]
    Busy,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("overwriting local answers requires confirmation")]
    NotConfirmed,

    #[error("invalid answers: {0}")]
    Engine(#[from] answer_engine::Error),
}

impl SyncError {
    /// Returns true if the credential must be replaced before retrying.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, SyncError::Auth(_))
    }

    /// Returns true for failures of the remote call itself.
    ///
    /// Malformed responses are handled exactly like transport failures.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_) | SyncError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Transport(format!("request timed out: {e}"))
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(SyncError::Auth("expired".into()).is_auth_failure());
        assert!(!SyncError::Auth("expired".into()).is_transport_failure());

        assert!(SyncError::Transport("refused".into()).is_transport_failure());
        assert!(SyncError::MalformedResponse("bad".into()).is_transport_failure());

        assert!(!SyncError::Busy.is_transport_failure());
        assert!(!SyncError::Busy.is_auth_failure());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            SyncError::Busy.to_string(),
            "a sync is already in progress"
        );
        assert_eq!(
            SyncError::Engine(answer_engine::Error::EmptyImport).to_string(),
            "invalid answers: no answers to import"
        );

        let err = StoreError::io(
            "/tmp/answers.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "store io error at /tmp/answers.json: denied");
    }
}
