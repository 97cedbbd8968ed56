//! Delivery and shutdown types shared between broker and receiver

/// Per-channel ordinal identifying one delivery
pub type DeliveryTag = u64;

/// One message handed to a consumer callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub consumer_tag: String,
    pub delivery_tag: DeliveryTag,
    pub payload: Vec<u8>,
}

impl Delivery {
    pub fn new(
        consumer_tag: impl Into<String>,
        delivery_tag: DeliveryTag,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            consumer_tag: consumer_tag.into(),
            delivery_tag,
            payload,
        }
    }
}

/// Classification of a shutdown signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Unrecoverable, e.g. the connection failed
    Hard,
    /// Expected termination, e.g. the consumer was cancelled
    Soft,
}

/// Why the broker terminated a consumer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShutdownReason {
    #[error("connection lost: {message}")]
    ConnectionLost { message: String },

    #[error("channel closed by broker ({code}): {text}")]
    ChannelClosed { code: u16, text: String },

    #[error("consumer cancelled by broker")]
    ConsumerCancelled,

    #[error("connection closed by application")]
    ApplicationClosed,
}

/// Termination notice delivered to [`Consumer::handle_shutdown`](crate::broker::Consumer::handle_shutdown)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{severity} shutdown: {reason}")]
pub struct ShutdownSignal {
    pub severity: Severity,
    #[source]
    pub reason: ShutdownReason,
}

impl ShutdownSignal {
    pub fn hard(reason: ShutdownReason) -> Self {
        Self {
            severity: Severity::Hard,
            reason,
        }
    }

    pub fn soft(reason: ShutdownReason) -> Self {
        Self {
            severity: Severity::Soft,
            reason,
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}
