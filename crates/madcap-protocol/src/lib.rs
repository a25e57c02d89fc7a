//! Wire-level types for Madcap.
//!
//! This crate defines the vocabulary shared by every other layer:
//!
//! - **Identity types** ([`ConnectionId`], [`SessionId`]) — who is talking
//!   and which game room they mean.
//! - **Lobby messages** ([`LobbyRequest`], [`LobbyReply`]) — the small set
//!   of framework messages that travel over the persistent connection.
//!   Game-move payloads are not part of this crate; they belong to the
//!   game layer and are opaque here.
//! - **Errors** ([`ProtocolError`]) — what can go wrong turning bytes into
//!   messages and back.

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{ConnectionId, LobbyReply, LobbyRequest, SessionId};
