//! The token authority: issues, validates, and rotates live tokens.
//!
//! # Concurrency note
//!
//! `TokenAuthority` is NOT thread-safe by itself — the live set is a plain
//! `Vec`. The server core wraps it in a mutex and runs each call as one
//! critical section, which is what makes rotation one-time: the match
//! check and the removal happen atomically together, so two callers
//! presenting the same token can never both rotate it.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::{AuthConfig, AuthError, Token};

/// Issues and rotates proof-of-identity tokens; owns the set of live ones.
///
/// ## Lifecycle
///
/// ```text
/// issue() ──→ [live] ──(authenticate: match)──→ consumed, replacement issued
///                │
///                └──(authenticate: expired)──→ evicted
/// ```
///
/// The live set is a `Vec` scanned linearly. A party-game server holds a
/// handful of live tokens at a time, and the same pass that looks for a
/// match also evicts expired entries, keeping the set bounded without a
/// sweeper task. A subject may hold several live tokens at once (one per
/// device/login).
pub struct TokenAuthority {
    live: Vec<Token>,
    config: AuthConfig,
}

impl TokenAuthority {
    /// Creates a new authority with no live tokens.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            live: Vec::new(),
            config,
        }
    }

    /// Issues a fresh token for `subject` and adds it to the live set.
    ///
    /// Always succeeds. The expiry is `now + token_lifetime_secs`.
    pub fn issue(&mut self, subject: &str) -> Token {
        let token = Token {
            subject: subject.to_string(),
            secret: generate_secret(),
            expires_at: Utc::now()
                + Duration::seconds(self.config.token_lifetime_secs),
        };
        self.live.push(token.clone());
        tracing::debug!(subject, "token issued");
        token
    }

    /// Validates `candidate` and rotates it in a single pass.
    ///
    /// The pass does two things at once:
    /// 1. Evicts every entry whose expiry has passed, whether or not it
    ///    matches the candidate (lazy expiry sweep).
    /// 2. Among the survivors, looks for an entry whose subject and secret
    ///    both equal the candidate's. A match is removed (one-time use)
    ///    and replaced with a brand-new token for the same subject, which
    ///    is returned.
    ///
    /// # Errors
    /// [`AuthError::AuthenticationFailed`] if nothing matched — the token
    /// was bad, expired, or already consumed by a racing request. The
    /// caller recovers by requiring a fresh login, never by crashing.
    pub fn authenticate(
        &mut self,
        candidate: &Token,
    ) -> Result<Token, AuthError> {
        let now = Utc::now();

        // Sweep first: expired entries go regardless of the candidate.
        self.live.retain(|t| !t.is_expired(now));

        let matched = self.live.iter().position(|t| t.matches(candidate));

        match matched {
            Some(index) => {
                let consumed = self.live.swap_remove(index);
                let replacement = self.issue(&consumed.subject);
                tracing::debug!(
                    subject = %consumed.subject,
                    "token rotated"
                );
                Ok(replacement)
            }
            None => Err(AuthError::AuthenticationFailed),
        }
    }

    /// Returns the number of live (unswept) tokens.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// Guessing a valid secret is computationally infeasible, which is what
/// makes the token an acceptable proof of identity on its own.
fn generate_secret() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
