//! Receiving side of the designated execution context

use crate::dispatch::{DispatchStatistics, DispatchTask};
use crate::handler::EventHandler;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

/// Serial task queue owned by the application
///
/// Whoever drives the loop is the designated execution context. It can be
/// awaited ([`run`](Self::run)) or polled from a host loop such as a UI tick
/// ([`run_pending`](Self::run_pending)); either way tasks execute one at a
/// time in FIFO order.
pub struct EventLoop {
    receiver: UnboundedReceiver<DispatchTask>,
    statistics: Arc<DispatchStatistics>,
}

impl EventLoop {
    pub(crate) fn new(
        receiver: UnboundedReceiver<DispatchTask>,
        statistics: Arc<DispatchStatistics>,
    ) -> Self {
        Self {
            receiver,
            statistics,
        }
    }

    /// Execute tasks until every dispatcher is dropped and the queue is empty
    ///
    /// Returns the number of tasks executed.
    pub async fn run<H: EventHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let mut executed = 0;
        while let Some(task) = self.receiver.recv().await {
            self.execute(task, handler);
            executed += 1;
        }
        log::debug!("Event loop finished after {} task(s)", executed);
        executed
    }

    /// Execute the next task, waiting for one to arrive
    ///
    /// Returns `false` once every dispatcher is dropped and the queue is empty.
    pub async fn run_next<H: EventHandler + ?Sized>(&mut self, handler: &mut H) -> bool {
        match self.receiver.recv().await {
            Some(task) => {
                self.execute(task, handler);
                true
            }
            None => false,
        }
    }

    /// Execute every task already queued without waiting
    ///
    /// Returns the number of tasks executed.
    pub fn run_pending<H: EventHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let mut executed = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(task) => {
                    self.execute(task, handler);
                    executed += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        executed
    }

    pub fn statistics(&self) -> Arc<DispatchStatistics> {
        self.statistics.clone()
    }

    fn execute<H: EventHandler + ?Sized>(&self, task: DispatchTask, handler: &mut H) {
        log::trace!("Executing {} task", task.name());
        self.statistics.record_executed();
        task.run(handler);
    }
}
