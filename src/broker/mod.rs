//! Broker client boundary
//!
//! The receiver only talks to the broker through the traits defined here:
//! a [`Connection`] hands out a [`Channel`], and a [`Channel`] accepts a
//! [`Consumer`] whose callbacks it runs on a thread it owns.
//!
//! ```text
//!  ┌────────────┐ channel()  ┌─────────┐ register_consumer ┌──────────────────┐
//!  │ Connection │ ─────────▶ │ Channel │ ◀──────────────── │ MessageReceiver  │
//!  └────────────┘            └────┬────┘                   └──────────────────┘
//!                                 │ broker thread
//!                                 ▼
//!                   handle_delivery / handle_shutdown
//!                                 │
//!                                 └──▶ acknowledge(delivery_tag, false)
//! ```
//!
//! [`memory`] provides a loopback implementation that runs one dedicated
//! thread per registered consumer.

mod error;
pub mod memory;
mod traits;
mod types;

pub use error::{BrokerError, BrokerResult};
pub use memory::{MemoryBroker, MemoryChannel, MemoryConnection};
pub use traits::{Channel, Connection, Consumer};
pub use types::{Delivery, DeliveryTag, Severity, ShutdownReason, ShutdownSignal};
