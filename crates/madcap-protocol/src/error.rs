//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding lobby messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing fields, or an
    /// unknown message tag).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
