//! Credential-check collaborator for validating user identity.
//!
//! Madcap doesn't store users or check passwords itself — that belongs to
//! whatever backs the deployment (a database, an auth provider, a test
//! double). This module defines the [`CredentialStore`] trait: the two
//! lookups the login and register flows need, and nothing else. Password
//! hashing stays entirely behind the implementation.

use crate::AuthError;

/// A user known to the external store.
///
/// Deliberately thin — the authentication layer only ever needs to know
/// that a user exists and what their canonical username is. Everything
/// else about a user is the store's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Canonical username, used as the token subject.
    pub username: String,
}

/// Looks up users and checks credentials.
///
/// `Send + Sync + 'static` because the store is shared across request
/// handler tasks for the life of the server.
pub trait CredentialStore: Send + Sync + 'static {
    /// Finds a user by username. `Ok(None)` means no such user — an
    /// expected condition, not an error.
    fn find_user(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserRecord>, AuthError>> + Send;

    /// Checks a username/secret pair. Returns `Ok(false)` for a wrong
    /// secret; `Err` is reserved for store infrastructure failures.
    fn verify_credentials(
        &self,
        username: &str,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;

    /// Creates a new user. The register flow checks for duplicates before
    /// calling this; how the secret is hashed and stored is entirely the
    /// implementation's concern.
    fn create_user(
        &self,
        username: &str,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;
}
