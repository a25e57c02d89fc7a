//! The session directory: creates, tracks, and routes connections to
//! game sessions.
//!
//! # Concurrency note
//!
//! `SessionDirectory` is NOT thread-safe by itself — plain `HashMap`s,
//! no locks. The server core wraps it in a mutex, which also guarantees
//! the key invariant here: the participant maps and the reverse
//! connection index only ever change together, inside one critical
//! section, so they can never diverge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use madcap_protocol::{ConnectionId, SessionId};

use crate::{GameSession, SessionError, TemplateRef};

/// Counter for generating unique session ids.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Maps session ids to live game sessions, plus the reverse index from
/// connection handle to session for O(1) disconnect handling.
pub struct SessionDirectory {
    /// Live sessions, keyed by id.
    sessions: HashMap<SessionId, GameSession>,

    /// Maps each connection to the session it's currently in.
    /// A connection is in at most ONE session at a time (key invariant),
    /// and this map is mutated in lockstep with the participant maps.
    by_connection: HashMap<ConnectionId, SessionId>,
}

impl SessionDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            by_connection: HashMap::new(),
        }
    }

    /// Creates a session and returns its id.
    ///
    /// With an explicit id, a collision against a live session is a
    /// [`SessionError::Duplicate`] and the existing session is untouched.
    /// With `None`, the id is derived from a process-unique monotonic
    /// counter rendered as compact hex. Generated ids can't collide with
    /// each other, but a host may have explicitly claimed a value the
    /// counter hasn't reached yet — those are skipped, never overwritten.
    pub fn create(
        &mut self,
        id: Option<String>,
        host: &str,
        template: TemplateRef,
    ) -> Result<SessionId, SessionError> {
        let session_id = match id {
            Some(explicit) => {
                let session_id = SessionId::new(explicit);
                if self.sessions.contains_key(&session_id) {
                    return Err(SessionError::Duplicate(session_id));
                }
                session_id
            }
            None => loop {
                let generated = SessionId::new(format!(
                    "{:x}",
                    NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed)
                ));
                if !self.sessions.contains_key(&generated) {
                    break generated;
                }
                // An explicit id claimed this counter value; move past it.
            },
        };

        let session =
            GameSession::new(session_id.clone(), host, template);
        self.sessions.insert(session_id.clone(), session);

        tracing::info!(%session_id, host, "session created");
        Ok(session_id)
    }

    /// Looks up a session by id. `None` means the game ended or never
    /// existed — callers map this to [`SessionError::NotFound`].
    pub fn get(&self, id: &SessionId) -> Option<&GameSession> {
        self.sessions.get(id)
    }

    /// Adds a connection to a session's participant set and records it
    /// in the reverse index, as one atomic unit.
    ///
    /// Rejoining with the same connection replaces the identity without
    /// duplicating the reverse entry. A connection that is currently in a
    /// *different* session is moved — removed there first — so the
    /// one-session-per-connection invariant holds across reconnects.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the session doesn't exist.
    pub fn join(
        &mut self,
        id: &SessionId,
        conn: ConnectionId,
        identity: Option<String>,
    ) -> Result<(), SessionError> {
        if !self.sessions.contains_key(id) {
            return Err(SessionError::NotFound(id.clone()));
        }

        if let Some(previous) = self.by_connection.get(&conn) {
            if previous != id {
                let previous = previous.clone();
                self.detach(conn, &previous);
            }
        }

        // Both structures mutate here, under the caller's lock.
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        session.participant_join(conn, identity);
        self.by_connection.insert(conn, id.clone());

        tracing::info!(
            session_id = %id,
            %conn,
            participants = self.sessions[id].participant_count(),
            "participant joined"
        );
        Ok(())
    }

    /// Removes a connection from whatever session it's in.
    ///
    /// Disconnect of an unknown or already-left connection is a no-op —
    /// the transport fires this on every socket close, known or not.
    /// Emptying a session does NOT finalize it; finalization is an
    /// explicit host/game-end action.
    pub fn leave(&mut self, conn: ConnectionId) {
        let Some(session_id) = self.by_connection.remove(&conn) else {
            return;
        };
        self.remove_participant(conn, &session_id);

        tracing::info!(session_id = %session_id, %conn, "participant left");
    }

    /// Detaches a session from the directory, scrubbing every reverse
    /// index entry that pointed at it. The removed session is returned so
    /// the caller can persist a snapshot (which it should have taken
    /// BEFORE removal — see the server core's finalize path).
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the session doesn't exist.
    pub fn remove(
        &mut self,
        id: &SessionId,
    ) -> Result<GameSession, SessionError> {
        let session = self
            .sessions
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        // Scrub the reverse index for every participant of this session.
        self.by_connection.retain(|_, sid| sid != id);

        tracing::info!(session_id = %id, "session removed from directory");
        Ok(session)
    }

    /// Clones a session for out-of-lock persistence. `None` if absent.
    pub fn snapshot(&self, id: &SessionId) -> Option<GameSession> {
        self.sessions.get(id).cloned()
    }

    /// Returns the session id a connection is currently in, if any.
    pub fn connection_session(
        &self,
        conn: ConnectionId,
    ) -> Option<&SessionId> {
        self.by_connection.get(&conn)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` if no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes `conn` from the participant map of `session_id`, with the
    /// reverse entry already gone. A missing session here means the two
    /// structures diverged, which the locking discipline is supposed to
    /// make impossible.
    fn remove_participant(
        &mut self,
        conn: ConnectionId,
        session_id: &SessionId,
    ) {
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                session.participant_leave(conn);
            }
            None => {
                debug_assert!(
                    false,
                    "reverse index pointed at missing session {session_id}"
                );
                tracing::error!(
                    %session_id,
                    %conn,
                    "reverse index pointed at a missing session"
                );
            }
        }
    }

    /// Removes `conn` from both structures for a known previous session.
    fn detach(&mut self, conn: ConnectionId, session_id: &SessionId) {
        self.by_connection.remove(&conn);
        self.remove_participant(conn, session_id);
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
