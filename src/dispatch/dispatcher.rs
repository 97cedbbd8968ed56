//! Posting side of the designated execution context

use crate::dispatch::{DispatchError, DispatchStatistics, DispatchTask, EventLoop};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

/// Pending-task count at which a warning is logged
pub const DEFAULT_HIGH_WATER_MARK: usize = 10000;

/// Capability to post work onto the designated execution context
///
/// `post` must never block the caller, which is usually a broker-owned
/// callback thread. Tasks posted from one thread run in the order they were
/// posted.
pub trait Dispatch: Send + Sync {
    fn post(&self, task: DispatchTask) -> Result<(), DispatchError>;
}

/// Default [`Dispatch`] backed by an unbounded tokio channel
///
/// Cloning is cheap; every clone feeds the same [`EventLoop`]. The loop ends
/// once all clones are dropped and the queue is drained.
#[derive(Clone)]
pub struct Dispatcher {
    sender: UnboundedSender<DispatchTask>,
    statistics: Arc<DispatchStatistics>,
    high_water_mark: usize,
}

impl Dispatcher {
    /// Create a dispatcher and the event loop it feeds
    pub fn new() -> (Self, EventLoop) {
        Self::with_high_water_mark(DEFAULT_HIGH_WATER_MARK)
    }

    pub fn with_high_water_mark(high_water_mark: usize) -> (Self, EventLoop) {
        let (sender, receiver) = unbounded_channel();
        let statistics = Arc::new(DispatchStatistics::new());

        let dispatcher = Self {
            sender,
            statistics: statistics.clone(),
            high_water_mark,
        };
        (dispatcher, EventLoop::new(receiver, statistics))
    }

    pub fn statistics(&self) -> Arc<DispatchStatistics> {
        self.statistics.clone()
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// True once the event loop has been dropped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Dispatch for Dispatcher {
    fn post(&self, task: DispatchTask) -> Result<(), DispatchError> {
        let name = task.name();
        let pending = self.statistics.record_posted();

        if self.sender.send(task).is_err() {
            self.statistics.record_rejected();
            return Err(DispatchError::ContextClosed);
        }

        if self
            .statistics
            .record_high_water(pending, self.high_water_mark)
        {
            log::warn!(
                "Designated execution context is falling behind: {} tasks pending",
                pending
            );
        }
        log::trace!("Posted {} task ({} pending)", name, pending);
        Ok(())
    }
}

impl<D: Dispatch + ?Sized> Dispatch for Arc<D> {
    fn post(&self, task: DispatchTask) -> Result<(), DispatchError> {
        (**self).post(task)
    }
}
