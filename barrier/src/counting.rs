use crate::latch::Latch;
use crate::CompletionBarrier;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

const SC: Ordering = Ordering::SeqCst;

/// Bounds the total number of completed units to a fixed count.
///
/// `granted` is bumped unconditionally on every [`grab_work`](CompletionBarrier::grab_work),
/// so under contention it may run past `target` by up to the number of
/// concurrent callers minus one. Each caller still decides on its own
/// increment, so no more than `target` grants are ever handed out.
pub struct CountingBarrier<F> {
    target: u64,
    granted: AtomicU64,
    on_done: F,
    latch: Latch,
}

impl<F> CountingBarrier<F>
where
    F: Fn() + Send + Sync,
{
    /// Creates a barrier that grants `num_reqs` units and calls `on_done`
    /// once per registered completion.
    pub fn new(num_reqs: u64, on_done: F) -> Self {
        debug!("counting barrier: target={}", num_reqs);
        Self {
            target: num_reqs,
            granted: AtomicU64::new(0),
            on_done,
            latch: Latch::new(num_reqs),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Raw grant counter. May exceed [`target`](Self::target) under contention.
    pub fn granted(&self) -> u64 {
        self.granted.load(SC)
    }

    pub fn remaining(&self) -> u64 {
        self.latch.remaining()
    }
}

impl<F> CompletionBarrier for CountingBarrier<F>
where
    F: Fn() + Send + Sync,
{
    fn grab_work(&self) -> bool {
        self.granted.fetch_add(1, SC) < self.target
    }

    fn job_done(&self) {
        (self.on_done)();
        self.latch.count_down();
    }

    fn wait(&self) {
        self.latch.wait();
        debug!("counting barrier: all {} units done", self.target);
    }
}
