//! Units of work posted to the designated execution context

use crate::broker::ShutdownSignal;
use crate::handler::EventHandler;
use crate::message::MessageData;

/// A posted unit of work
///
/// Each task owns exactly the value it hands to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTask {
    MessageReceived(MessageData),
    Disconnect(ShutdownSignal),
}

impl DispatchTask {
    /// Invoke the matching handler capability, consuming the task
    pub fn run<H: EventHandler + ?Sized>(self, handler: &mut H) {
        match self {
            DispatchTask::MessageReceived(message) => handler.on_message_received(message),
            DispatchTask::Disconnect(signal) => handler.on_disconnect(signal),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DispatchTask::MessageReceived(_) => "message-received",
            DispatchTask::Disconnect(_) => "disconnect",
        }
    }
}
