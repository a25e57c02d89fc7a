//! The token entity and its cookie encoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;

// ---------------------------------------------------------------------------
// AuthConfig
// ---------------------------------------------------------------------------

/// Configuration for token behavior.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long (in seconds) an issued token stays valid. Each rotation
    /// restarts the clock, so an active caller never expires mid-session.
    ///
    /// Default: 3600 seconds (one hour).
    pub token_lifetime_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_lifetime_secs: 3600,
        }
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// An opaque proof of authenticated identity.
///
/// A token is valid only while `now < expires_at`, and matching for
/// authentication requires BOTH `subject` and `secret` to be equal.
/// Tokens are never mutated after creation — rotation replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The identity this token proves (a username).
    pub subject: String,

    /// Unguessable random value: 32 lowercase hex characters (128 bits).
    pub secret: String,

    /// The instant this token stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Returns `true` if the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Returns `true` if `candidate` proves the same identity: subject
    /// and secret must both match exactly. Expiry is NOT checked here —
    /// the authority checks it against its own stored copy, so a forged
    /// `expires_at` in a presented token buys nothing.
    pub fn matches(&self, candidate: &Token) -> bool {
        self.subject == candidate.subject && self.secret == candidate.secret
    }

    /// Serializes the token into a cookie-safe string: base64url over the
    /// JSON payload. Reversible without loss via [`Token::from_cookie`].
    pub fn to_cookie(&self) -> String {
        // Serializing a struct of strings and a timestamp can't fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parses a token from its cookie form.
    ///
    /// A cookie that doesn't decode is treated the same as a token that
    /// doesn't match: [`AuthError::AuthenticationFailed`]. Malformed input
    /// is an expected condition, never a panic.
    pub fn from_cookie(cookie: &str) -> Result<Token, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cookie)
            .map_err(|_| AuthError::AuthenticationFailed)?;
        serde_json::from_slice(&bytes)
            .map_err(|_| AuthError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_token() -> Token {
        Token {
            subject: "alice".into(),
            secret: "aabbccddeeff00112233445566778899".into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_is_expired_future_expiry_returns_false() {
        let token = sample_token();
        assert!(!token.is_expired(Utc::now()));
    }

    #[test]
    fn test_is_expired_past_expiry_returns_true() {
        let mut token = sample_token();
        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(token.is_expired(Utc::now()));
    }

    #[test]
    fn test_is_expired_exact_boundary_counts_as_expired() {
        // `expires_at <= now` — a token expiring exactly now is dead.
        let now = Utc::now();
        let mut token = sample_token();
        token.expires_at = now;
        assert!(token.is_expired(now));
    }

    #[test]
    fn test_matches_requires_both_subject_and_secret() {
        let token = sample_token();

        let mut wrong_secret = token.clone();
        wrong_secret.secret = "00000000000000000000000000000000".into();
        assert!(!token.matches(&wrong_secret));

        let mut wrong_subject = token.clone();
        wrong_subject.subject = "bob".into();
        assert!(!token.matches(&wrong_subject));

        assert!(token.matches(&token.clone()));
    }

    #[test]
    fn test_matches_ignores_presented_expiry() {
        // A caller can put whatever expiry they like in the candidate;
        // matching only looks at subject + secret.
        let token = sample_token();
        let mut forged = token.clone();
        forged.expires_at = Utc::now() + Duration::days(365);
        assert!(token.matches(&forged));
    }

    #[test]
    fn test_cookie_round_trip_is_lossless() {
        let token = sample_token();
        let cookie = token.to_cookie();
        let decoded = Token::from_cookie(&cookie).expect("should decode");
        assert_eq!(token, decoded);
    }

    #[test]
    fn test_from_cookie_rejects_garbage() {
        assert!(matches!(
            Token::from_cookie("!!! not base64 !!!"),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_from_cookie_rejects_valid_base64_wrong_shape() {
        let cookie = URL_SAFE_NO_PAD.encode(br#"{"hello": "world"}"#);
        assert!(matches!(
            Token::from_cookie(&cookie),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_auth_config_default_lifetime() {
        assert_eq!(AuthConfig::default().token_lifetime_secs, 3600);
    }
}
