//! Receiver Error Types

use crate::broker::BrokerError;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The consumer could not be registered; no callback is active
    #[error("Failed to start consumer '{consumer_tag}' on queue '{queue}'")]
    Registration {
        consumer_tag: String,
        queue: String,
        #[source]
        source: BrokerError,
    },
}

impl crate::core::error_handling::ContextualError for NetworkError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for receiver operations
pub type ReceiverResult<T> = Result<T, NetworkError>;
