//! Message receiver
//!
//! Registers a manual-ack consumer on the queue named by the connection's
//! identity tag and bridges its callbacks onto the designated execution
//! context.
//!
//! Per delivery, on the broker thread:
//!
//! ```text
//! Received ─▶ Decoding ─┬─▶ Dispatched ───┬─▶ Acknowledged
//!                       └─▶ DecodeFailed ─┘
//! ```
//!
//! A payload that fails to decode is logged and still acknowledged, so the
//! broker drops it rather than redelivering it.
//!
//! On termination, a hard shutdown signal is posted as a disconnect task; a
//! soft one is only logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use msgbridge::broker::MemoryBroker;
//! use msgbridge::dispatch::Dispatcher;
//! use msgbridge::receiver::MessageReceiver;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let broker = MemoryBroker::new();
//! broker.declare_queue("alice");
//! let connection = Arc::new(broker.connect("alice"));
//!
//! let (dispatcher, _event_loop) = Dispatcher::new();
//! let receiver = MessageReceiver::new(connection.clone(), Arc::new(dispatcher));
//! receiver.start_consuming()?;
//! assert_eq!(receiver.consumer_tag(), "alice.consumer");
//! # Ok(())
//! # }
//! ```

mod consumer;
mod error;
mod registration;

pub use error::{NetworkError, ReceiverResult};
pub use registration::{MessageReceiver, CONSUMER_TAG_SUFFIX};

#[cfg(test)]
mod tests;
