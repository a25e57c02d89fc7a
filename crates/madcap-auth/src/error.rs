//! Error types for the authentication layer.

/// Errors that can occur while validating identity.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No live token matched the presented one. Covers bad secrets,
    /// expired tokens, already-consumed tokens, and cookies that don't
    /// decode at all — the caller can't tell these apart, and shouldn't.
    /// Recovery is always the same: clear credentials, log in again.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The credential store collaborator failed. This is an infrastructure
    /// problem, not a bad login.
    #[error("credential store error: {0}")]
    Store(String),
}
