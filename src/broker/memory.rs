//! In-process loopback broker
//!
//! Implements the [`Connection`] and [`Channel`] traits without any network.
//! Each registered consumer gets its own named thread which receives
//! deliveries and shutdown signals over an unbounded tokio channel and runs
//! the consumer callbacks sequentially, the way a broker client library runs
//! consumers on threads it owns.
//!
//! Consumer threads hold the channel through their consumer, so they only
//! exit after [`MemoryChannel::cancel_consumer`] or
//! [`MemoryChannel::close_connection`]. Use [`MemoryChannel::join_consumers`]
//! to wait for them.
//!
//! # Example
//!
//! ```rust,no_run
//! use msgbridge::broker::{MemoryBroker, ShutdownReason};
//!
//! let broker = MemoryBroker::new();
//! broker.declare_queue("alice");
//! let connection = broker.connect("alice");
//! let channel = connection.memory_channel();
//!
//! // Buffered until a consumer registers on the queue
//! channel.publish("alice", br#"{"type":"TEXT","content":"hi"}"#.to_vec()).unwrap();
//!
//! channel.close_connection(ShutdownReason::ApplicationClosed);
//! channel.join_consumers();
//! ```

use crate::broker::{
    BrokerError, BrokerResult, Channel, Connection, Consumer, Delivery, DeliveryTag,
    ShutdownReason, ShutdownSignal,
};
use crate::core::sync::handle_mutex_poison;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

enum ConsumerCommand {
    Deliver(Delivery),
    Shutdown(ShutdownSignal),
}

struct ConsumerSlot {
    consumer_tag: String,
    queue: String,
    auto_ack: bool,
    sender: UnboundedSender<ConsumerCommand>,
}

#[derive(Default)]
struct ChannelState {
    closed: bool,
    consumers: Vec<ConsumerSlot>,
    workers: Vec<JoinHandle<()>>,
    backlog: HashMap<String, VecDeque<Vec<u8>>>,
    unacked: BTreeSet<DeliveryTag>,
    acknowledged: Vec<DeliveryTag>,
    last_delivery_tag: DeliveryTag,
    next_consumer: usize,
    registration_failure: Option<BrokerError>,
}

impl ChannelState {
    fn next_delivery_tag(&mut self) -> DeliveryTag {
        self.last_delivery_tag += 1;
        self.last_delivery_tag
    }

    /// Hand a payload to the slot at `index`, assigning the next delivery tag
    ///
    /// A slot whose thread has exited is removed and the payload is lost.
    fn deliver_to(&mut self, index: usize, payload: Vec<u8>) -> BrokerResult<DeliveryTag> {
        let delivery_tag = self.next_delivery_tag();
        let slot = &self.consumers[index];
        let consumer_tag = slot.consumer_tag.clone();
        let auto_ack = slot.auto_ack;
        let delivery = Delivery::new(consumer_tag.clone(), delivery_tag, payload);

        if slot.sender.send(ConsumerCommand::Deliver(delivery)).is_err() {
            log::warn!(
                "Consumer thread for '{}' has exited; delivery {} discarded",
                consumer_tag,
                delivery_tag
            );
            self.consumers.remove(index);
            return Err(BrokerError::ConsumerNotFound { consumer_tag });
        }

        if auto_ack {
            self.acknowledged.push(delivery_tag);
        } else {
            self.unacked.insert(delivery_tag);
        }
        Ok(delivery_tag)
    }
}

fn transport_error(message: String) -> BrokerError {
    BrokerError::Transport { message }
}

/// Loopback broker holding the set of declared queues
#[derive(Clone, Default)]
pub struct MemoryBroker {
    queues: Arc<Mutex<HashSet<String>>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a queue; declaring an existing queue is a no-op
    pub fn declare_queue(&self, name: &str) {
        if let Ok(mut queues) = self.queues.lock() {
            if queues.insert(name.to_string()) {
                log::debug!("Declared queue '{}'", name);
            }
        }
    }

    pub fn has_queue(&self, name: &str) -> bool {
        self.queues
            .lock()
            .map(|queues| queues.contains(name))
            .unwrap_or(false)
    }

    /// Open a connection identified by `user_tag`, with its own channel
    pub fn connect(&self, user_tag: &str) -> MemoryConnection {
        MemoryConnection {
            user_tag: user_tag.to_string(),
            channel: Arc::new(MemoryChannel {
                queues: self.queues.clone(),
                state: Mutex::new(ChannelState::default()),
            }),
        }
    }
}

/// Connection to a [`MemoryBroker`]
pub struct MemoryConnection {
    user_tag: String,
    channel: Arc<MemoryChannel>,
}

impl MemoryConnection {
    /// The concrete channel, for publishing and broker-side control
    pub fn memory_channel(&self) -> Arc<MemoryChannel> {
        self.channel.clone()
    }
}

impl Connection for MemoryConnection {
    fn channel(&self) -> Arc<dyn Channel> {
        self.channel.clone()
    }

    fn user_tag(&self) -> &str {
        &self.user_tag
    }
}

/// Channel of a [`MemoryConnection`]
pub struct MemoryChannel {
    queues: Arc<Mutex<HashSet<String>>>,
    state: Mutex<ChannelState>,
}

impl MemoryChannel {
    fn lock_state(&self) -> BrokerResult<MutexGuard<'_, ChannelState>> {
        handle_mutex_poison(self.state.lock(), transport_error)
    }

    fn queue_exists(&self, queue: &str) -> BrokerResult<bool> {
        let queues = handle_mutex_poison(self.queues.lock(), transport_error)?;
        Ok(queues.contains(queue))
    }

    /// Make the next `register_consumer` call fail with `error`
    pub fn fail_next_registration(&self, error: BrokerError) {
        if let Ok(mut state) = self.state.lock() {
            state.registration_failure = Some(error);
        }
    }

    /// Publish a payload to `queue`
    ///
    /// With consumers registered the payload goes to the next one in
    /// round-robin order and its delivery tag is returned. Without consumers
    /// it is buffered and `None` is returned.
    pub fn publish(&self, queue: &str, payload: Vec<u8>) -> BrokerResult<Option<DeliveryTag>> {
        if !self.queue_exists(queue)? {
            return Err(BrokerError::QueueNotFound {
                queue: queue.to_string(),
            });
        }

        let mut state = self.lock_state()?;
        if state.closed {
            return Err(BrokerError::ChannelClosed);
        }

        let candidates: Vec<usize> = state
            .consumers
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.queue == queue)
            .map(|(index, _)| index)
            .collect();

        if candidates.is_empty() {
            state
                .backlog
                .entry(queue.to_string())
                .or_default()
                .push_back(payload);
            log::debug!("No consumer on '{}'; message buffered", queue);
            return Ok(None);
        }

        let index = candidates[state.next_consumer % candidates.len()];
        state.next_consumer = state.next_consumer.wrapping_add(1);
        state.deliver_to(index, payload).map(Some)
    }

    /// Cancel a consumer from the broker side, sending it a soft shutdown signal
    pub fn cancel_consumer(&self, consumer_tag: &str) -> BrokerResult<()> {
        let mut state = self.lock_state()?;
        let position = state
            .consumers
            .iter()
            .position(|slot| slot.consumer_tag == consumer_tag)
            .ok_or_else(|| BrokerError::ConsumerNotFound {
                consumer_tag: consumer_tag.to_string(),
            })?;

        let slot = state.consumers.remove(position);
        let signal = ShutdownSignal::soft(ShutdownReason::ConsumerCancelled);
        let _ = slot.sender.send(ConsumerCommand::Shutdown(signal));
        log::debug!("Cancelled consumer '{}'", consumer_tag);
        Ok(())
    }

    /// Close the channel, sending a hard shutdown signal to every consumer
    ///
    /// Deliveries already handed to a consumer are still processed first and
    /// may still be acknowledged.
    pub fn close_connection(&self, reason: ShutdownReason) {
        let Ok(mut state) = self.lock_state() else {
            log::error!("Cannot close poisoned channel");
            return;
        };
        state.closed = true;

        for slot in state.consumers.drain(..) {
            let signal = ShutdownSignal::hard(reason.clone());
            let _ = slot.sender.send(ConsumerCommand::Shutdown(signal));
        }
        log::debug!("Channel closed: {}", reason);
    }

    /// Wait for every consumer thread started so far to exit
    pub fn join_consumers(&self) {
        let workers = match self.lock_state() {
            Ok(mut state) => std::mem::take(&mut state.workers),
            Err(_) => return,
        };

        for worker in workers {
            let name = worker.thread().name().unwrap_or("consumer").to_string();
            if worker.join().is_err() {
                log::error!("Consumer thread '{}' panicked", name);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().map(|state| state.closed).unwrap_or(true)
    }

    /// Number of active consumer registrations on this channel
    pub fn consumer_count(&self) -> usize {
        self.lock_state()
            .map(|state| state.consumers.len())
            .unwrap_or(0)
    }

    pub fn consumer_tags(&self) -> Vec<String> {
        self.lock_state()
            .map(|state| {
                state
                    .consumers
                    .iter()
                    .map(|slot| slot.consumer_tag.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every successfully acknowledged delivery tag, in acknowledgment order
    pub fn acknowledged_tags(&self) -> Vec<DeliveryTag> {
        self.lock_state()
            .map(|state| state.acknowledged.clone())
            .unwrap_or_default()
    }

    /// Delivery tags handed to consumers and not yet acknowledged
    pub fn unacknowledged_tags(&self) -> Vec<DeliveryTag> {
        self.lock_state()
            .map(|state| state.unacked.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Channel for MemoryChannel {
    fn register_consumer(
        &self,
        queue: &str,
        auto_ack: bool,
        consumer_tag: &str,
        consumer: Box<dyn Consumer>,
    ) -> BrokerResult<()> {
        let queue_exists = self.queue_exists(queue)?;
        let mut state = self.lock_state()?;

        if let Some(error) = state.registration_failure.take() {
            return Err(error);
        }
        if state.closed {
            return Err(BrokerError::ChannelClosed);
        }
        if !queue_exists {
            return Err(BrokerError::QueueNotFound {
                queue: queue.to_string(),
            });
        }

        let (sender, mut receiver) = unbounded_channel::<ConsumerCommand>();
        let thread_tag = consumer_tag.to_string();
        let mut consumer = consumer;

        let worker = std::thread::Builder::new()
            .name(format!("consumer-{}", consumer_tag))
            .spawn(move || {
                while let Some(command) = receiver.blocking_recv() {
                    match command {
                        ConsumerCommand::Deliver(delivery) => consumer.handle_delivery(&delivery),
                        ConsumerCommand::Shutdown(signal) => {
                            consumer.handle_shutdown(&thread_tag, &signal);
                            break;
                        }
                    }
                }
                log::trace!("Consumer thread for '{}' exiting", thread_tag);
            })
            .map_err(|e| BrokerError::Transport {
                message: format!("failed to spawn consumer thread: {}", e),
            })?;

        state.workers.push(worker);
        state.consumers.push(ConsumerSlot {
            consumer_tag: consumer_tag.to_string(),
            queue: queue.to_string(),
            auto_ack,
            sender,
        });
        let index = state.consumers.len() - 1;

        let buffered = state.backlog.remove(queue).unwrap_or_default();
        if !buffered.is_empty() {
            log::debug!(
                "Flushing {} buffered message(s) from '{}' to '{}'",
                buffered.len(),
                queue,
                consumer_tag
            );
        }
        for payload in buffered {
            if let Err(e) = state.deliver_to(index, payload) {
                log::warn!("Stopped flushing backlog of '{}': {}", queue, e);
                break;
            }
        }

        log::debug!(
            "Registered consumer '{}' on queue '{}' (auto_ack: {})",
            consumer_tag,
            queue,
            auto_ack
        );
        Ok(())
    }

    fn acknowledge(&self, delivery_tag: DeliveryTag, multiple: bool) -> BrokerResult<()> {
        let mut state = self.lock_state()?;

        if multiple {
            let covered: Vec<DeliveryTag> = state.unacked.range(..=delivery_tag).copied().collect();
            if covered.is_empty() {
                return Err(BrokerError::UnknownDeliveryTag { delivery_tag });
            }
            for tag in covered {
                state.unacked.remove(&tag);
                state.acknowledged.push(tag);
            }
            return Ok(());
        }

        if !state.unacked.remove(&delivery_tag) {
            return Err(BrokerError::UnknownDeliveryTag { delivery_tag });
        }
        state.acknowledged.push(delivery_tag);
        Ok(())
    }
}
