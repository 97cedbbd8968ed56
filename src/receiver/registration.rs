//! Consumer registration

use crate::broker::Connection;
use crate::dispatch::Dispatch;
use crate::receiver::consumer::DeliveryConsumer;
use crate::receiver::{NetworkError, ReceiverResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Appended to the identity tag to form the consumer tag
pub const CONSUMER_TAG_SUFFIX: &str = ".consumer";

/// Bridges one connection's queue to the designated execution context
pub struct MessageReceiver {
    connection: Arc<dyn Connection>,
    dispatcher: Arc<dyn Dispatch>,
    consumer_tag: String,
    registrations: AtomicUsize,
}

impl MessageReceiver {
    pub fn new(connection: Arc<dyn Connection>, dispatcher: Arc<dyn Dispatch>) -> Self {
        let consumer_tag = format!("{}{}", connection.user_tag(), CONSUMER_TAG_SUFFIX);

        Self {
            connection,
            dispatcher,
            consumer_tag,
            registrations: AtomicUsize::new(0),
        }
    }

    pub fn consumer_tag(&self) -> &str {
        &self.consumer_tag
    }

    /// Queue consumed from, which is the connection's identity tag
    pub fn queue_name(&self) -> &str {
        self.connection.user_tag()
    }

    /// Number of successful `start_consuming` calls
    pub fn registration_count(&self) -> usize {
        self.registrations.load(Ordering::Acquire)
    }

    /// Register the delivery callback with manual acknowledgment
    ///
    /// Each call creates a new registration under the same consumer tag;
    /// calling this twice leaves two consumers active.
    pub fn start_consuming(&self) -> ReceiverResult<()> {
        let queue = self.queue_name();
        let channel = self.connection.channel();
        let consumer = DeliveryConsumer::new(channel.clone(), self.dispatcher.clone());

        if self.registration_count() > 0 {
            log::warn!(
                "Consumer '{}' is already registered; registering another under the same tag",
                self.consumer_tag
            );
        }

        channel
            .register_consumer(queue, false, &self.consumer_tag, Box::new(consumer))
            .map_err(|source| NetworkError::Registration {
                consumer_tag: self.consumer_tag.clone(),
                queue: queue.to_string(),
                source,
            })?;

        self.registrations.fetch_add(1, Ordering::AcqRel);
        log::info!(
            "Consumer '{}' started on queue '{}'",
            self.consumer_tag,
            queue
        );
        Ok(())
    }

    /// Kept for existing call sites; the broker client owns the consumer once registered
    pub fn stop_consuming(&self) {
        log::debug!("Stopping consumer '{}'...", self.consumer_tag);
    }
}
