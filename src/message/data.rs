//! Decoded message structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a message, matching the `type` tag on the wire
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Text,
    Notice,
}

/// Fields shared by every message kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// A successfully decoded message
///
/// # Example
///
/// ```rust
/// use msgbridge::message::{MessageData, MessageKind};
///
/// let message = MessageData::text("hi").with_sender("alice");
/// assert_eq!(message.kind(), MessageKind::Text);
/// assert_eq!(message.body().sender.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageData {
    /// A chat line written by a user
    Text(MessageBody),
    /// A system notice such as a join or leave announcement
    Notice(MessageBody),
}

impl MessageData {
    pub fn text(content: impl Into<String>) -> Self {
        MessageData::Text(MessageBody {
            content: content.into(),
            sender: None,
            sent_at: None,
        })
    }

    pub fn notice(content: impl Into<String>) -> Self {
        MessageData::Notice(MessageBody {
            content: content.into(),
            sender: None,
            sent_at: None,
        })
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.body_mut().sender = Some(sender.into());
        self
    }

    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.body_mut().sent_at = Some(sent_at);
        self
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            MessageData::Text(_) => MessageKind::Text,
            MessageData::Notice(_) => MessageKind::Notice,
        }
    }

    pub fn body(&self) -> &MessageBody {
        match self {
            MessageData::Text(body) | MessageData::Notice(body) => body,
        }
    }

    fn body_mut(&mut self) -> &mut MessageBody {
        match self {
            MessageData::Text(body) | MessageData::Notice(body) => body,
        }
    }

    pub fn content(&self) -> &str {
        &self.body().content
    }
}
