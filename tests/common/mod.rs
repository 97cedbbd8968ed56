//! Shared helpers for the integration tests

use msgbridge::broker::ShutdownSignal;
use msgbridge::handler::EventHandler;
use msgbridge::message::{encode, MessageData};

/// Handler that keeps everything it is given
#[derive(Debug, Default)]
pub struct CollectingHandler {
    pub messages: Vec<MessageData>,
    pub disconnects: Vec<ShutdownSignal>,
}

impl EventHandler for CollectingHandler {
    fn on_message_received(&mut self, message: MessageData) {
        self.messages.push(message);
    }

    fn on_disconnect(&mut self, signal: ShutdownSignal) {
        self.disconnects.push(signal);
    }
}

impl CollectingHandler {
    pub fn contents_from(&self, sender: &str) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.body().sender.as_deref() == Some(sender))
            .map(|m| m.content().to_string())
            .collect()
    }
}

pub fn payload_from(sender: &str, content: &str) -> Vec<u8> {
    encode(&MessageData::text(content).with_sender(sender)).expect("message should encode")
}
