//! Synchronization utilities for robust mutex handling

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a mutex poison error into an application-specific error using the
/// provided constructor. A poisoned lock means a panic occurred while the lock
/// was held, typically inside a consumer callback thread.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use msgbridge::core::sync::handle_mutex_poison;
/// use msgbridge::broker::BrokerError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| BrokerError::Transport { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
