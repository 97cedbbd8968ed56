//! Generic error handling utilities
//!
//! Provides unified error reporting across the receiver, broker and
//! configuration error types while keeping detail at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// User-actionable errors (a bad identity in the configuration, a missing
/// config file) show their specific message. System errors (registration
/// failures, broken channels) show the operation context and keep the detail
/// for debug output.
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`. When it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use msgbridge::core::error_handling::log_error_with_context;
/// # use msgbridge::app::config::ConfigError;
/// let err = ConfigError::Invalid { message: "identity must not be empty".to_string() };
/// log_error_with_context(&err, "Configuration loading");
/// // Logs: "FATAL: identity must not be empty"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    if error.is_user_actionable() {
        if let Some(user_msg) = error.user_message() {
            log::error!("FATAL: {}", user_msg);
        } else {
            log::error!("FATAL: {}", operation_context);
        }
    } else {
        log::error!("FATAL: {}: {}", operation_context, error);
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::ConfigError;
    use crate::broker::BrokerError;
    use crate::receiver::NetworkError;

    #[test]
    fn test_config_error_is_user_actionable() {
        let error = ConfigError::Invalid {
            message: "identity must not be empty".to_string(),
        };

        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("identity must not be empty"));
        log_error_with_context(&error, "Configuration loading");
    }

    #[test]
    fn test_registration_error_uses_generic_context() {
        let error = NetworkError::Registration {
            consumer_tag: "alice.consumer".to_string(),
            queue: "alice".to_string(),
            source: BrokerError::QueueNotFound {
                queue: "alice".to_string(),
            },
        };

        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);
        log_error_with_context(&error, "Consumer registration");
    }
}
