//! Collaborator traits for the broker client

use crate::broker::{BrokerResult, Delivery, DeliveryTag, ShutdownSignal};
use std::sync::Arc;

/// Callbacks a channel invokes for one consumer registration
///
/// Both callbacks run on the thread the broker client owns for this
/// consumer, one at a time. They must always return normally.
pub trait Consumer: Send + 'static {
    /// Called once for every message delivered to the consumer
    fn handle_delivery(&mut self, delivery: &Delivery);

    /// Called once when the broker terminates the consumer
    fn handle_shutdown(&mut self, consumer_tag: &str, signal: &ShutdownSignal);
}

/// Channel capabilities the receiver needs
pub trait Channel: Send + Sync {
    /// Start delivering messages from `queue` to `consumer`
    ///
    /// On error the consumer is dropped without any callback having run.
    fn register_consumer(
        &self,
        queue: &str,
        auto_ack: bool,
        consumer_tag: &str,
        consumer: Box<dyn Consumer>,
    ) -> BrokerResult<()>;

    /// Mark a delivery as processed
    ///
    /// With `multiple = false` exactly one delivery is acknowledged.
    fn acknowledge(&self, delivery_tag: DeliveryTag, multiple: bool) -> BrokerResult<()>;
}

/// An established broker connection
pub trait Connection: Send + Sync {
    fn channel(&self) -> Arc<dyn Channel>;

    /// Identity of this application instance; names the queue and prefixes the consumer tag
    fn user_tag(&self) -> &str;
}
