//! Application-side event sink

use crate::broker::ShutdownSignal;
use crate::message::MessageData;

/// Receives everything the bridge surfaces to the application
///
/// Both methods are only ever called from the designated execution context,
/// i.e. from whatever drives [`EventLoop`](crate::dispatch::EventLoop).
/// Implementations therefore need neither `Send` nor interior locking.
pub trait EventHandler {
    /// A delivery decoded successfully
    fn on_message_received(&mut self, message: MessageData);

    /// The consumer was terminated by a hard shutdown signal
    fn on_disconnect(&mut self, signal: ShutdownSignal);
}

impl<H: EventHandler + ?Sized> EventHandler for Box<H> {
    fn on_message_received(&mut self, message: MessageData) {
        (**self).on_message_received(message)
    }

    fn on_disconnect(&mut self, signal: ShutdownSignal) {
        (**self).on_disconnect(signal)
    }
}
