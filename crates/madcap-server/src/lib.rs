//! Madcap server: composition root and WebSocket lobby.
//!
//! [`ServerCore`] is the one process-wide coordination point: it owns the
//! live token set and the session directory behind their own mutexes, and
//! every request handler reaches both through a shared `Arc`. There is no
//! lazily-initialized global — the core is constructed once at startup
//! (see `main.rs` or the tests) and injected everywhere.
//!
//! [`MadcapServer`] runs the accept loop for the persistent lobby
//! connections; each connection gets its own task and a drop guard that
//! turns a socket close into a `leave`.

mod core;
mod error;
mod handler;
mod memory;
mod server;

pub use crate::core::{Credentials, ServerCore};
pub use error::ServerError;
pub use memory::MemoryStore;
pub use server::{MadcapServer, MadcapServerBuilder};
