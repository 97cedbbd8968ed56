//! Cross-thread dispatch onto the designated execution context
//!
//! Broker callback threads post immutable [`DispatchTask`] values through a
//! [`Dispatch`] implementation; a single [`EventLoop`] owned by the
//! application drains them in FIFO order and invokes the
//! [`EventHandler`](crate::handler::EventHandler).
//!
//! ```text
//!  broker thread (consumer A) ──post──┐
//!                                     ▼
//!                        ┌─────────────────────────┐
//!                        │ unbounded tokio mpsc    │
//!                        └────────────┬────────────┘
//!                                     ▼
//!          EventLoop::run / run_pending (designated context)
//!                                     │
//!                                     ▼
//!                on_message_received / on_disconnect
//! ```
//!
//! # Example
//!
//! ```rust
//! use msgbridge::dispatch::{Dispatch, DispatchTask, Dispatcher};
//! use msgbridge::handler::EventHandler;
//! use msgbridge::message::MessageData;
//! use msgbridge::broker::ShutdownSignal;
//!
//! struct Printer;
//!
//! impl EventHandler for Printer {
//!     fn on_message_received(&mut self, message: MessageData) {
//!         println!("{}", message.content());
//!     }
//!     fn on_disconnect(&mut self, signal: ShutdownSignal) {
//!         println!("disconnected: {}", signal);
//!     }
//! }
//!
//! let (dispatcher, mut event_loop) = Dispatcher::new();
//! dispatcher.post(DispatchTask::MessageReceived(MessageData::text("hi"))).unwrap();
//! assert_eq!(event_loop.run_pending(&mut Printer), 1);
//! ```

mod dispatcher;
mod error;
mod event_loop;
mod statistics;
mod task;

pub use dispatcher::{Dispatch, Dispatcher, DEFAULT_HIGH_WATER_MARK};
pub use error::DispatchError;
pub use event_loop::EventLoop;
pub use statistics::DispatchStatistics;
pub use task::DispatchTask;
