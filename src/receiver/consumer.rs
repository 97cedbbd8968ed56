//! Broker callbacks for one consumer registration

use crate::broker::{Channel, Consumer, Delivery, ShutdownSignal};
use crate::dispatch::{Dispatch, DispatchTask};
use crate::message::{self, payload_preview};
use std::sync::Arc;

/// Decodes, dispatches and acknowledges deliveries
///
/// Runs on the broker's consumer thread. Neither callback returns an error or
/// panics on bad input: every failure is logged and swallowed.
pub(crate) struct DeliveryConsumer {
    channel: Arc<dyn Channel>,
    dispatcher: Arc<dyn Dispatch>,
}

impl DeliveryConsumer {
    pub(crate) fn new(channel: Arc<dyn Channel>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            channel,
            dispatcher,
        }
    }
}

impl Consumer for DeliveryConsumer {
    fn handle_delivery(&mut self, delivery: &Delivery) {
        let delivery_tag = delivery.delivery_tag;
        log::debug!(
            "Received delivery {} ({} bytes)",
            delivery_tag,
            delivery.payload.len()
        );

        match message::decode(&delivery.payload) {
            Ok(message) => {
                log::debug!(
                    "Dispatching {} message from delivery {}",
                    message.kind(),
                    delivery_tag
                );
                if let Err(e) = self.dispatcher.post(DispatchTask::MessageReceived(message)) {
                    log::warn!(
                        "Delivery {} on '{}' not dispatched: {}",
                        delivery_tag,
                        delivery.consumer_tag,
                        e
                    );
                }
            }
            Err(e) => {
                log::warn!(
                    "Dropping delivery {} on '{}': {} | data_length: {}, data_preview: '{}'",
                    delivery_tag,
                    delivery.consumer_tag,
                    e,
                    delivery.payload.len(),
                    payload_preview(&delivery.payload)
                );
            }
        }

        // Always exactly one single-message ack, whatever the decode outcome
        if let Err(e) = self.channel.acknowledge(delivery_tag, false) {
            log::error!(
                "Failed to acknowledge delivery {} on '{}': {}",
                delivery_tag,
                delivery.consumer_tag,
                e
            );
        }
    }

    fn handle_shutdown(&mut self, consumer_tag: &str, signal: &ShutdownSignal) {
        log::info!("Received shutdown signal from {}: {}", consumer_tag, signal);

        if signal.is_hard() {
            if let Err(e) = self.dispatcher.post(DispatchTask::Disconnect(signal.clone())) {
                log::warn!("Disconnect for '{}' not dispatched: {}", consumer_tag, e);
            }
        }
    }
}
