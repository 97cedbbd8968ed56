//! Decode Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The bytes do not match any known message type
    #[error("Unrecognized message encoding: {reason}")]
    UnrecognizedEncoding { reason: String },
}
