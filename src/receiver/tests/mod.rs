//! Test modules for the message receiver
//!
//! Shared fixtures live here: a channel that records every broker call and
//! lets tests drive consumer callbacks directly, and a handler that records
//! what reached the designated execution context.


use crate::broker::{
    BrokerError, BrokerResult, Channel, Connection, Consumer, Delivery, DeliveryTag,
    ShutdownSignal,
};
use crate::handler::EventHandler;
use crate::message::MessageData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RegistrationCall {
    pub queue: String,
    pub auto_ack: bool,
    pub consumer_tag: String,
}

#[derive(Default)]
pub(super) struct RecordingChannel {
    registrations: Mutex<Vec<RegistrationCall>>,
    consumers: Mutex<Vec<Box<dyn Consumer>>>,
    acks: Mutex<Vec<(DeliveryTag, bool)>>,
    registration_failure: Mutex<Option<BrokerError>>,
    fail_acks: AtomicBool,
}

impl RecordingChannel {
    pub fn failing_registration(error: BrokerError) -> Self {
        let channel = Self::default();
        *channel.registration_failure.lock().unwrap() = Some(error);
        channel
    }

    pub fn fail_acks(&self) {
        self.fail_acks.store(true, Ordering::SeqCst);
    }

    pub fn registrations(&self) -> Vec<RegistrationCall> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.lock().unwrap().len()
    }

    pub fn acks(&self) -> Vec<(DeliveryTag, bool)> {
        self.acks.lock().unwrap().clone()
    }

    /// Run the delivery callback of registration `index` on the calling thread
    pub fn deliver(&self, index: usize, delivery_tag: DeliveryTag, payload: &[u8]) {
        let delivery = Delivery::new("test.consumer", delivery_tag, payload.to_vec());
        let mut consumers = self.consumers.lock().unwrap();
        consumers[index].handle_delivery(&delivery);
    }

    /// Run the shutdown callback of registration `index` on the calling thread
    pub fn shutdown(&self, index: usize, signal: ShutdownSignal) {
        let mut consumers = self.consumers.lock().unwrap();
        consumers[index].handle_shutdown("test.consumer", &signal);
    }
}

impl Channel for RecordingChannel {
    fn register_consumer(
        &self,
        queue: &str,
        auto_ack: bool,
        consumer_tag: &str,
        consumer: Box<dyn Consumer>,
    ) -> BrokerResult<()> {
        if let Some(error) = self.registration_failure.lock().unwrap().take() {
            return Err(error);
        }
        self.registrations.lock().unwrap().push(RegistrationCall {
            queue: queue.to_string(),
            auto_ack,
            consumer_tag: consumer_tag.to_string(),
        });
        self.consumers.lock().unwrap().push(consumer);
        Ok(())
    }

    fn acknowledge(&self, delivery_tag: DeliveryTag, multiple: bool) -> BrokerResult<()> {
        self.acks.lock().unwrap().push((delivery_tag, multiple));
        if self.fail_acks.load(Ordering::SeqCst) {
            return Err(BrokerError::Transport {
                message: "ack timed out".to_string(),
            });
        }
        Ok(())
    }
}

pub(super) struct RecordingConnection {
    user_tag: String,
    channel: Arc<RecordingChannel>,
}

impl RecordingConnection {
    pub fn new(user_tag: &str, channel: RecordingChannel) -> Arc<Self> {
        Arc::new(Self {
            user_tag: user_tag.to_string(),
            channel: Arc::new(channel),
        })
    }

    pub fn recording_channel(&self) -> Arc<RecordingChannel> {
        self.channel.clone()
    }
}

impl Connection for RecordingConnection {
    fn channel(&self) -> Arc<dyn Channel> {
        self.channel.clone()
    }

    fn user_tag(&self) -> &str {
        &self.user_tag
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum HandlerEvent {
    Message(MessageData),
    Disconnect(ShutdownSignal),
}

#[derive(Default)]
pub(super) struct RecordingHandler {
    pub events: Vec<HandlerEvent>,
}

impl RecordingHandler {
    pub fn messages(&self) -> Vec<MessageData> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HandlerEvent::Message(message) => Some(message.clone()),
                HandlerEvent::Disconnect(_) => None,
            })
            .collect()
    }

    pub fn disconnects(&self) -> Vec<ShutdownSignal> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HandlerEvent::Disconnect(signal) => Some(signal.clone()),
                HandlerEvent::Message(_) => None,
            })
            .collect()
    }
}

impl EventHandler for RecordingHandler {
    fn on_message_received(&mut self, message: MessageData) {
        self.events.push(HandlerEvent::Message(message));
    }

    fn on_disconnect(&mut self, signal: ShutdownSignal) {
        self.events.push(HandlerEvent::Disconnect(signal));
    }
}

pub(super) fn text_payload(content: &str) -> Vec<u8> {
    crate::message::encode(&MessageData::text(content)).unwrap()
}
