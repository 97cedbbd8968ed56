//! JSON codec for [`MessageData`]

use crate::message::{DecodeError, MessageData};

const PREVIEW_LEN: usize = 100;

/// Decode a delivery payload
///
/// Any payload that is not a JSON object with a known `type` tag, including
/// non-UTF-8 bytes, yields [`DecodeError::UnrecognizedEncoding`].
pub fn decode(bytes: &[u8]) -> Result<MessageData, DecodeError> {
    serde_json::from_slice(bytes).map_err(|e| DecodeError::UnrecognizedEncoding {
        reason: e.to_string(),
    })
}

/// Encode a message into a delivery payload
pub fn encode(message: &MessageData) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(message)
}

/// Lossy, truncated rendering of a payload for log lines
pub fn payload_preview(bytes: &[u8]) -> String {
    if bytes.len() > PREVIEW_LEN {
        format!("{}...", String::from_utf8_lossy(&bytes[..PREVIEW_LEN]))
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
