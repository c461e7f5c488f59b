use std::hint;
use std::thread;
use std::time::{Duration, Instant};

/// One unit of work issued by a worker loop.
pub trait Workload: Send + Sync {
    fn execute(&self);
}

/// Parks the worker thread, like waiting on a remote response.
pub struct SleepWorkload {
    latency: Duration,
}

impl SleepWorkload {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Workload for SleepWorkload {
    fn execute(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

/// Burns CPU for the whole latency instead of parking.
pub struct SpinWorkload {
    latency: Duration,
}

impl SpinWorkload {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Workload for SpinWorkload {
    fn execute(&self) {
        let start = Instant::now();
        while start.elapsed() < self.latency {
            hint::spin_loop();
        }
    }
}
