//! Dispatch Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The event loop was dropped; the task was not queued
    #[error("Designated execution context is gone")]
    ContextClosed,
}
