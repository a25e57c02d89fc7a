//! The game-session entity.

use std::collections::HashMap;
use std::fmt;

use madcap_protocol::ConnectionId;

/// Opaque reference to the word-game template a session plays.
///
/// The session layer never looks inside a template — it just carries the
/// reference along so the store can resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef(String);

impl TemplateRef {
    /// Wraps a template reference string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One running game room.
///
/// Created by a host action, mutated by join/leave, and finalized
/// (persisted and dropped from the live directory) when the game ends.
/// Participants are keyed by connection handle; the identity is `None`
/// for anonymous guests.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Unique id across all live sessions.
    pub id: madcap_protocol::SessionId,

    /// Username of the host who created the session.
    pub host: String,

    /// The template this session plays.
    pub template: TemplateRef,

    /// Live participants: connection handle → optional display identity.
    participants: HashMap<ConnectionId, Option<String>>,
}

impl GameSession {
    /// Creates a session with an empty participant set.
    pub fn new(
        id: madcap_protocol::SessionId,
        host: impl Into<String>,
        template: TemplateRef,
    ) -> Self {
        Self {
            id,
            host: host.into(),
            template,
            participants: HashMap::new(),
        }
    }

    /// Inserts or replaces a participant. Rejoining with the same
    /// connection is an idempotent upsert of the identity.
    pub(crate) fn participant_join(
        &mut self,
        conn: ConnectionId,
        identity: Option<String>,
    ) {
        self.participants.insert(conn, identity);
    }

    /// Removes a participant. Returns `false` if the connection wasn't
    /// in this session.
    pub(crate) fn participant_leave(&mut self, conn: ConnectionId) -> bool {
        self.participants.remove(&conn).is_some()
    }

    /// Returns the display identity for a connection, if it participates.
    /// The outer `Option` is membership; the inner one is anonymity.
    pub fn participant(
        &self,
        conn: ConnectionId,
    ) -> Option<&Option<String>> {
        self.participants.get(&conn)
    }

    /// Number of live participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// `true` if nobody is connected. An empty session is eligible for
    /// finalization but is never finalized implicitly — a host reconnect
    /// mid-game must not find their room gone.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
