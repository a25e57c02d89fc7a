//! Unified error type for the Madcap server.

use madcap_auth::AuthError;
use madcap_protocol::ProtocolError;
use madcap_session::SessionError;

/// Top-level error that wraps the layer errors and adds the conditions
/// only the server core can detect (user lookups, ownership checks).
///
/// Every variant here is an expected, recoverable condition reported to
/// the caller with a distinguishing status — none of them crash the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// An authentication-layer error (bad/expired/consumed token).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A session-layer error (not found, duplicate id, store failure).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A protocol-level error (undecodable lobby message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Login for a username the store doesn't know.
    #[error("user {0} does not exist")]
    UnknownUser(String),

    /// The username exists but the secret didn't check out.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration with a username that's already taken. Surfaced, never
    /// a silent success.
    #[error("user {0} already exists")]
    DuplicateUser(String),

    /// Authenticated, but the target resource belongs to someone else.
    /// Distinct from a failed authentication.
    #[error("resource {0} not owned by caller")]
    ResourceNotOwned(String),

    /// The target resource doesn't exist.
    #[error("resource {0} does not exist")]
    ResourceNotFound(String),

    /// Binding or accepting connections failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A WebSocket send/receive failed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ServerError {
    /// HTTP-style status code reported to clients alongside the message.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Auth(AuthError::AuthenticationFailed)
            | Self::InvalidCredentials => 401,
            Self::Auth(AuthError::Store(_)) => 500,
            Self::ResourceNotOwned(_) => 403,
            Self::Session(SessionError::NotFound(_))
            | Self::UnknownUser(_)
            | Self::ResourceNotFound(_) => 404,
            Self::Session(SessionError::Duplicate(_))
            | Self::DuplicateUser(_) => 409,
            Self::Session(SessionError::NotImplemented(_)) => 501,
            Self::Protocol(_) => 400,
            Self::Session(SessionError::Store(_))
            | Self::Io(_)
            | Self::Transport(_) => 500,
        }
    }
}
