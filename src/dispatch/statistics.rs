//! Counters shared between dispatchers and the event loop

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Statistics for one dispatcher/event-loop pair
pub struct DispatchStatistics {
    pending: AtomicUsize,
    posted: AtomicUsize,
    executed: AtomicUsize,
    high_water_warnings: AtomicUsize,
    above_high_water: AtomicBool,
    last_executed_time: RwLock<Option<Instant>>,
}

impl Default for DispatchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchStatistics {
    pub fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            posted: AtomicUsize::new(0),
            executed: AtomicUsize::new(0),
            high_water_warnings: AtomicUsize::new(0),
            above_high_water: AtomicBool::new(false),
            last_executed_time: RwLock::new(None),
        }
    }

    /// Tasks posted but not yet executed
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn posted(&self) -> usize {
        self.posted.load(Ordering::Relaxed)
    }

    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::Relaxed)
    }

    /// Number of times the pending count crossed the high-water mark
    pub fn high_water_warnings(&self) -> usize {
        self.high_water_warnings.load(Ordering::Relaxed)
    }

    pub fn last_executed_time(&self) -> Option<Instant> {
        *self.last_executed_time.read().ok()?
    }

    /// Record a post and return the new pending count
    pub(crate) fn record_posted(&self) -> usize {
        self.posted.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// True when a post takes `pending` to the mark from below
    ///
    /// Rearmed by the next post that sees `pending` under the mark.
    pub(crate) fn record_high_water(&self, pending: usize, high_water_mark: usize) -> bool {
        if pending < high_water_mark {
            self.above_high_water.store(false, Ordering::Relaxed);
            return false;
        }
        if self.above_high_water.swap(true, Ordering::Relaxed) {
            return false;
        }
        self.high_water_warnings.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Undo a post whose send failed
    pub(crate) fn record_rejected(&self) {
        saturating_decrement(&self.posted);
        saturating_decrement(&self.pending);
    }

    pub(crate) fn record_executed(&self) {
        saturating_decrement(&self.pending);
        self.executed.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut time) = self.last_executed_time.write() {
            *time = Some(Instant::now());
        }
    }
}

fn saturating_decrement(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        current.checked_sub(1)
    });
}
