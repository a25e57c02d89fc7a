//! Identity newtypes and the lobby message set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a single live connection.
///
/// Assigned by the server when a connection is accepted. This is the handle
/// the participant registry keys on: a `ConnectionId` appears in at most one
/// game session at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opaque identifier for a game session (one running room).
///
/// Externally this is always an opaque string — callers must not assume a
/// numeric format. Generated ids happen to be lowercase hex, but a host may
/// also supply their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an externally supplied id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Lobby messages
// ---------------------------------------------------------------------------

/// Client → server lobby messages.
///
/// These cover the connection-based actions the core handles itself.
/// Anything game-specific rides on a separate channel and is not part of
/// this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LobbyRequest {
    /// "Put me in this session." `display_name` is `None` for anonymous
    /// guests who haven't logged in.
    Join {
        session_id: SessionId,
        display_name: Option<String>,
    },

    /// "I'm leaving my current session." Closing the socket has the same
    /// effect; this is the polite version.
    Leave,
}

/// Server → client lobby messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LobbyReply {
    /// The join succeeded; `participants` is the current headcount.
    Joined {
        session_id: SessionId,
        participants: usize,
    },

    /// Something went wrong. `code` follows HTTP conventions
    /// (401 = unauthenticated, 404 = not found, 409 = conflict).
    Error { code: u16, message: String },
}

impl LobbyRequest {
    /// Decodes a lobby request from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

impl LobbyReply {
    /// Encodes a lobby reply into bytes for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        // `#[serde(transparent)]` means SessionId("a3f") → `"a3f"`,
        // not `{"0":"a3f"}`. Clients see an opaque string.
        let json = serde_json::to_string(&SessionId::new("a3f")).unwrap();
        assert_eq!(json, "\"a3f\"");
    }

    #[test]
    fn test_session_id_display_is_opaque_string() {
        assert_eq!(SessionId::new("room1").to_string(), "room1");
    }

    #[test]
    fn test_lobby_request_join_json_format() {
        let msg = LobbyRequest::Join {
            session_id: SessionId::new("a3f"),
            display_name: Some("alice".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Join");
        assert_eq!(json["session_id"], "a3f");
        assert_eq!(json["display_name"], "alice");
    }

    #[test]
    fn test_lobby_request_join_anonymous() {
        // Guests join without a display name — `None` becomes `null`.
        let msg = LobbyRequest::Join {
            session_id: SessionId::new("a3f"),
            display_name: None,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Join");
        assert!(json["display_name"].is_null());
    }

    #[test]
    fn test_lobby_request_leave_round_trip() {
        let msg = LobbyRequest::Leave;
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded = LobbyRequest::from_bytes(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_lobby_reply_error_json_format() {
        let msg = LobbyReply::Error {
            code: 404,
            message: "session not found".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Error");
        assert_eq!(json["code"], 404);
    }

    #[test]
    fn test_lobby_reply_joined_round_trip() {
        let msg = LobbyReply::Joined {
            session_id: SessionId::new("room1"),
            participants: 2,
        };
        let bytes = msg.to_bytes().unwrap();
        let decoded: LobbyReply = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result = LobbyRequest::from_bytes(garbage);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_request_type_returns_error() {
        let unknown = br#"{"type": "FlyToMoon", "speed": 9000}"#;
        assert!(LobbyRequest::from_bytes(unknown).is_err());
    }
}
