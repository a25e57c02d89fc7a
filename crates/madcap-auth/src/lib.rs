//! Authentication-token lifecycle for Madcap.
//!
//! This crate owns the rotating proof-of-identity tokens that carry a
//! caller's identity across stateless requests:
//!
//! 1. **Issuance** — a fresh [`Token`] with an unguessable secret and an
//!    expiry ([`TokenAuthority::issue`]).
//! 2. **Validation + rotation** — presenting a token consumes it and
//!    yields a replacement, so a leaked cookie is good for at most one
//!    request ([`TokenAuthority::authenticate`]).
//! 3. **Expiry** — lazy: expired entries are swept out during the same
//!    pass that looks for a match. No background timer.
//!
//! Credential checking (passwords) is delegated to the
//! [`CredentialStore`] collaborator — this crate never sees a password
//! hash.

#![allow(async_fn_in_trait)]

mod authority;
mod error;
mod store;
mod token;

pub use authority::TokenAuthority;
pub use error::AuthError;
pub use store::{CredentialStore, UserRecord};
pub use token::{AuthConfig, Token};
