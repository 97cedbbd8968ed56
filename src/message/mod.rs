//! Chat message types and their wire encoding
//!
//! Payloads are JSON documents tagged by an upper-case `type` field:
//!
//! ```json
//! {"type": "TEXT", "content": "hi", "sender": "alice", "sent_at": "2026-10-14T09:30:00Z"}
//! ```
//!
//! [`decode`] returns an explicit result so the delivery path can decide
//! whether there is anything to dispatch.

mod codec;
mod data;
mod error;

pub use codec::{decode, encode, payload_preview};
pub use data::{MessageBody, MessageData, MessageKind};
pub use error::DecodeError;
