//! Error types for the session layer.

use madcap_protocol::SessionId;

/// Errors that can occur during session directory operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No live session has this id. The game may have ended or never
    /// existed — callers surface this as not-found, never as fatal.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// A caller-supplied id collides with a live session. The existing
    /// session is left untouched; the caller must pick another id.
    #[error("session {0} already exists")]
    Duplicate(SessionId),

    /// The store collaborator doesn't implement this operation yet.
    /// Surfaced explicitly rather than pretending the call succeeded.
    #[error("not implemented by the store: {0}")]
    NotImplemented(&'static str),

    /// The store collaborator failed.
    #[error("session store error: {0}")]
    Store(String),
}
