//! Live game-session tracking for Madcap.
//!
//! This crate owns the in-memory registry of running game rooms:
//!
//! - [`GameSession`] — one room: host, template reference, and the set of
//!   participants currently connected to it.
//! - [`SessionDirectory`] — creates and looks up sessions by id, and keeps
//!   the reverse connection→session index in lockstep with each session's
//!   participant map so a disconnect resolves in O(1).
//! - [`SessionStore`] — the external persistence collaborator. Finalizing
//!   a session snapshots it through this trait before the live copy is
//!   dropped.
//!
//! Nothing here does I/O and nothing blocks; the server core wraps the
//! directory in a mutex and keeps every read-modify-write inside one
//! critical section.

#![allow(async_fn_in_trait)]

mod directory;
mod error;
mod session;
mod store;

pub use directory::SessionDirectory;
pub use error::SessionError;
pub use session::{GameSession, TemplateRef};
pub use store::{SessionStore, TemplateRecord};
