//! Counted join primitive.
//!
//! A [`Latch`] is created for a fixed number of parties. Each party calls
//! [`Latch::count_down`] once when it finishes, and a controller blocks in
//! [`Latch::wait`] until every party has done so.
//!
//! The count itself is an atomic, so signalling never contends on a lock.
//! Only the party that brings the count to zero takes the mutex, to wake
//! the waiters.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};

const SC: Ordering = Ordering::SeqCst;

pub struct Latch {
    remaining: AtomicU64,
    lock: Mutex<()>,
    cond: Condvar,
}

impl Latch {
    /// Creates a latch expecting `parties` calls to [`count_down`](Self::count_down).
    pub fn new(parties: u64) -> Self {
        Self {
            remaining: AtomicU64::new(parties),
            lock: Mutex::new(()),
            cond: Condvar::new(),
        }
    }

    /// Signals that one party has finished.
    ///
    /// # Panics
    /// If called more times than the number of parties.
    pub fn count_down(&self) {
        let prev = self
            .remaining
            .fetch_update(SC, SC, |n| n.checked_sub(1))
            .unwrap_or_else(|_| panic!("latch signalled more times than its party count"));
        if prev == 1 {
            let _guard = self.lock.lock();
            self.cond.notify_all();
        }
    }

    /// Blocks until every party has called [`count_down`](Self::count_down).
    pub fn wait(&self) {
        let mut guard = self.lock.lock();
        while self.remaining.load(SC) > 0 {
            self.cond.wait(&mut guard);
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining.load(SC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_parties_does_not_block() {
        let latch = Latch::new(0);
        latch.wait();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_wait_released_by_last_party() {
        let latch = Arc::new(Latch::new(4));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let latch = latch.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(10 * i));
                    latch.count_down();
                })
            })
            .collect();
        latch.wait();
        assert_eq!(latch.remaining(), 0);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_wait_blocks_until_count_reaches_zero() {
        let latch = Arc::new(Latch::new(2));
        latch.count_down();
        let waiter = {
            let latch = latch.clone();
            thread::spawn(move || latch.wait())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
        latch.count_down();
        waiter.join().unwrap();
    }

    #[test]
    #[should_panic(expected = "more times than its party count")]
    fn test_over_signal_panics() {
        let latch = Latch::new(1);
        latch.count_down();
        latch.count_down();
    }
}
