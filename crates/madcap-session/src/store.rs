//! Persistence collaborator for finished sessions and templates.
//!
//! The directory keeps sessions in memory only; durability belongs to
//! whatever backs the deployment. This module defines the [`SessionStore`]
//! trait the server core calls — always with the directory lock released,
//! since store calls may do real I/O.
//!
//! The template CRUD paths are declared here but default to
//! [`SessionError::NotImplemented`]: the endpoints exist and the error is
//! explicit, instead of an empty success that looks like it worked.

use crate::{GameSession, SessionError};

/// A word-game template as the store knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Template id.
    pub id: String,
    /// Username of the creator; only they may modify or delete it.
    pub owner: String,
    /// The template body (opaque to the session layer).
    pub body: String,
}

/// Persists finished sessions and serves template CRUD.
pub trait SessionStore: Send + Sync + 'static {
    /// Writes a snapshot of a finished session. Called before the live
    /// copy leaves the directory, so a crash in between loses nothing.
    fn persist_session(
        &self,
        session: &GameSession,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Fetches a template. `Ok(None)` means no such template.
    fn fetch_template(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<TemplateRecord>, SessionError>> + Send
    {
        let _ = id;
        async { Err(SessionError::NotImplemented("fetch_template")) }
    }

    /// Replaces a template body. Ownership is checked by the caller.
    fn update_template(
        &self,
        template: &TemplateRecord,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send
    {
        let _ = template;
        async { Err(SessionError::NotImplemented("update_template")) }
    }

    /// Deletes a template. Ownership is checked by the caller.
    fn delete_template(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send
    {
        let _ = id;
        async { Err(SessionError::NotImplemented("delete_template")) }
    }
}
