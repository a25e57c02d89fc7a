//! `ServerCore`: the process-wide coordination point.
//!
//! Owns the live token set and the session directory, each behind its own
//! mutex. Every operation here is a short in-memory critical section; the
//! only store calls that happen while a caller waits (`finalize_session`,
//! template CRUD) run with all locks released.

use madcap_auth::{AuthConfig, CredentialStore, Token, TokenAuthority};
use madcap_protocol::{ConnectionId, SessionId};
use madcap_session::{
    GameSession, SessionDirectory, SessionError, SessionStore,
    TemplateRecord, TemplateRef,
};
use tokio::sync::Mutex;

use crate::ServerError;

/// The cookie pair handed back to an authenticated caller: an identity
/// label and the serialized token payload. The client presents the
/// payload on its next request and receives a fresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Identity label (the username).
    pub identity: String,
    /// Serialized one-time token, cookie-safe.
    pub cookie: String,
}

/// Composes the token authority, the session directory, and the external
/// store as one explicitly constructed object.
///
/// Built once at process start, shared into every handler task via `Arc`,
/// and dropped at shutdown — in-memory state does not survive restarts.
pub struct ServerCore<S> {
    tokens: Mutex<TokenAuthority>,
    directory: Mutex<SessionDirectory>,
    store: S,
}

impl<S: CredentialStore + SessionStore> ServerCore<S> {
    /// Creates a core with an empty token set and session directory.
    pub fn new(config: AuthConfig, store: S) -> Self {
        Self {
            tokens: Mutex::new(TokenAuthority::new(config)),
            directory: Mutex::new(SessionDirectory::new()),
            store,
        }
    }

    /// The external store collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Authentication flows ------------------------------------------------

    /// Logs a user in: store lookup, credential check, token issuance.
    ///
    /// # Errors
    /// [`ServerError::UnknownUser`] if the username doesn't exist,
    /// [`ServerError::InvalidCredentials`] if the secret is wrong.
    pub async fn login(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Credentials, ServerError> {
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or_else(|| ServerError::UnknownUser(username.to_string()))?;

        if !self.store.verify_credentials(&user.username, secret).await? {
            return Err(ServerError::InvalidCredentials);
        }

        let token = self.tokens.lock().await.issue(&user.username);
        tracing::info!(username = %user.username, "login succeeded");
        Ok(credentials_for(&token))
    }

    /// Registers a new user and logs them in.
    ///
    /// # Errors
    /// [`ServerError::DuplicateUser`] if the username is taken — surfaced
    /// to the caller, never swallowed into a fake success.
    pub async fn register(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<Credentials, ServerError> {
        if self.store.find_user(username).await?.is_some() {
            return Err(ServerError::DuplicateUser(username.to_string()));
        }
        self.store.create_user(username, secret).await?;

        let token = self.tokens.lock().await.issue(username);
        tracing::info!(username, "user registered");
        Ok(credentials_for(&token))
    }

    /// Validates a presented cookie and rotates the token behind it.
    ///
    /// On success the caller gets a fresh cookie pair; the presented one
    /// is dead either way (consumed on success, never live on failure).
    ///
    /// # Errors
    /// [`madcap_auth::AuthError::AuthenticationFailed`] — the caller's
    /// contract is to clear its stored credentials and require a re-login.
    pub async fn authenticate(
        &self,
        cookie: &str,
    ) -> Result<Credentials, ServerError> {
        let candidate = Token::from_cookie(cookie)?;
        // Sweep, match, and rotate as one critical section.
        let rotated = self.tokens.lock().await.authenticate(&candidate)?;
        Ok(credentials_for(&rotated))
    }

    // -- Session lifecycle ---------------------------------------------------

    /// Creates a game session. `id` is used as-is when supplied;
    /// otherwise one is generated.
    pub async fn create_session(
        &self,
        id: Option<String>,
        host: &str,
        template: TemplateRef,
    ) -> Result<SessionId, ServerError> {
        let mut directory = self.directory.lock().await;
        Ok(directory.create(id, host, template)?)
    }

    /// Adds a connection to a session. Returns the participant count
    /// after the join.
    pub async fn join_session(
        &self,
        id: &SessionId,
        conn: ConnectionId,
        identity: Option<String>,
    ) -> Result<usize, ServerError> {
        let mut directory = self.directory.lock().await;
        directory.join(id, conn, identity)?;
        Ok(directory
            .get(id)
            .map(GameSession::participant_count)
            .unwrap_or_default())
    }

    /// Removes a connection from whatever session it's in. A no-op for
    /// unknown connections — the transport calls this on every close.
    pub async fn disconnect(&self, conn: ConnectionId) {
        self.directory.lock().await.leave(conn);
    }

    /// Ends a game: persists a snapshot, then drops the live session and
    /// its reverse-index entries.
    ///
    /// The snapshot is taken under the lock, persisted with the lock
    /// released (the store may do real I/O), and only then removed —
    /// a crash between the steps loses nothing.
    pub async fn finalize_session(
        &self,
        id: &SessionId,
    ) -> Result<(), ServerError> {
        let snapshot = self
            .directory
            .lock()
            .await
            .snapshot(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        self.store.persist_session(&snapshot).await?;

        match self.directory.lock().await.remove(id) {
            Ok(_) => Ok(()),
            // A racing finalize removed it after we persisted; the
            // outcome the caller asked for holds either way.
            Err(SessionError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Clones a session for inspection. `None` if it isn't live.
    pub async fn session_snapshot(
        &self,
        id: &SessionId,
    ) -> Option<GameSession> {
        self.directory.lock().await.snapshot(id)
    }

    /// Number of live (unswept) tokens. Mostly useful in tests.
    pub async fn live_token_count(&self) -> usize {
        self.tokens.lock().await.live_count()
    }

    // -- Template CRUD (thin authorization shim over the store) --------------

    /// Replaces a template body on behalf of `caller`.
    ///
    /// # Errors
    /// [`ServerError::ResourceNotFound`] if the template doesn't exist,
    /// [`ServerError::ResourceNotOwned`] if `caller` isn't its owner —
    /// an authorization failure, distinct from failed authentication.
    pub async fn update_template(
        &self,
        caller: &str,
        id: &str,
        body: &str,
    ) -> Result<(), ServerError> {
        let existing = self.owned_template(caller, id).await?;
        self.store
            .update_template(&TemplateRecord {
                body: body.to_string(),
                ..existing
            })
            .await?;
        Ok(())
    }

    /// Deletes a template on behalf of `caller`. Same authorization rules
    /// as [`ServerCore::update_template`].
    pub async fn delete_template(
        &self,
        caller: &str,
        id: &str,
    ) -> Result<(), ServerError> {
        self.owned_template(caller, id).await?;
        self.store.delete_template(id).await?;
        Ok(())
    }

    async fn owned_template(
        &self,
        caller: &str,
        id: &str,
    ) -> Result<TemplateRecord, ServerError> {
        let template = self
            .store
            .fetch_template(id)
            .await?
            .ok_or_else(|| ServerError::ResourceNotFound(id.to_string()))?;
        if template.owner != caller {
            return Err(ServerError::ResourceNotOwned(id.to_string()));
        }
        Ok(template)
    }
}

fn credentials_for(token: &Token) -> Credentials {
    Credentials {
        identity: token.subject.clone(),
        cookie: token.to_cookie(),
    }
}
