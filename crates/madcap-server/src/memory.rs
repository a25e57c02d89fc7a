//! In-memory store: the dev and test double for the external store.
//!
//! Holds users, finished-session snapshots, and templates in maps behind
//! async mutexes. Secrets are compared as plain strings — hashing is the
//! concern of a real store implementation, and this one never leaves a
//! developer's machine.
//!
//! `update_template` and `delete_template` deliberately keep the trait
//! defaults, so those paths surface `NotImplemented` end to end.

use std::collections::HashMap;

use madcap_auth::{AuthError, CredentialStore, UserRecord};
use madcap_session::{
    GameSession, SessionError, SessionStore, TemplateRecord,
};
use tokio::sync::Mutex;

/// Volatile store backing a dev server or a test.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, String>>,
    templates: Mutex<HashMap<String, TemplateRecord>>,
    finished: Mutex<Vec<GameSession>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a template, bypassing ownership checks. Test setup only has
    /// this entry point; the CRUD surface stays unimplemented.
    pub async fn seed_template(&self, template: TemplateRecord) {
        self.templates
            .lock()
            .await
            .insert(template.id.clone(), template);
    }

    /// Snapshots persisted so far, in finalization order.
    pub async fn persisted_sessions(&self) -> Vec<GameSession> {
        self.finished.lock().await.clone()
    }
}

impl CredentialStore for MemoryStore {
    async fn find_user(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.lock().await.get(username).map(|_| UserRecord {
            username: username.to_string(),
        }))
    }

    async fn verify_credentials(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<bool, AuthError> {
        Ok(self
            .users
            .lock()
            .await
            .get(username)
            .is_some_and(|stored| stored.as_str() == secret))
    }

    async fn create_user(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<(), AuthError> {
        self.users
            .lock()
            .await
            .insert(username.to_string(), secret.to_string());
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    async fn persist_session(
        &self,
        session: &GameSession,
    ) -> Result<(), SessionError> {
        self.finished.lock().await.push(session.clone());
        Ok(())
    }

    async fn fetch_template(
        &self,
        id: &str,
    ) -> Result<Option<TemplateRecord>, SessionError> {
        Ok(self.templates.lock().await.get(id).cloned())
    }
}
