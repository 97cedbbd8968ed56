//! Broker Error Types

use crate::broker::DeliveryTag;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("Queue not found: {queue}")]
    QueueNotFound { queue: String },

    #[error("Consumer not found: {consumer_tag}")]
    ConsumerNotFound { consumer_tag: String },

    #[error("Unknown delivery tag: {delivery_tag}")]
    UnknownDeliveryTag { delivery_tag: DeliveryTag },

    #[error("Channel is closed")]
    ChannelClosed,

    #[error("Transport failure: {message}")]
    Transport { message: String },
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;
