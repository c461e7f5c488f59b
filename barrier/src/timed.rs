use crate::latch::Latch;
use crate::CompletionBarrier;
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const SC: Ordering = Ordering::SeqCst;
const TICK: Duration = Duration::from_secs(1);

struct TimedState {
    expired: AtomicBool,
    latch: Latch,
}

impl TimedState {
    // Returns true only for the call that flips the flag.
    fn expire(&self) -> bool {
        self.expired.compare_exchange(false, true, SC, SC).is_ok()
    }
}

// Expires the barrier when the ticker exits, including by unwinding out of
// a panicking tick callback, so workers always see the flag.
struct ExpireOnExit(Arc<TimedState>);

impl Drop for ExpireOnExit {
    fn drop(&mut self) {
        if self.0.expire() && thread::panicking() {
            warn!("timed barrier: tick callback panicked, expiring early");
        }
    }
}

/// Bounds work by wall-clock duration.
///
/// A background `barrier-ticker` thread calls the tick callback once per
/// second for `floor(duration.as_secs())` seconds, then sets the expiry flag.
/// Sub-second remainders are dropped, so a 2.7s barrier expires after 2s.
///
/// Each party signals the join from inside [`grab_work`](CompletionBarrier::grab_work)
/// the first time it observes expiry; [`job_done`](CompletionBarrier::job_done) is a no-op.
/// A worker that keeps calling `grab_work` after a `false` result signals
/// the join again and eventually panics the latch.
///
/// If the tick callback panics, the barrier expires at that point and
/// [`wait`](CompletionBarrier::wait) logs the panic after the join releases.
pub struct TimedBarrier {
    state: Arc<TimedState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl TimedBarrier {
    /// Creates a barrier for `parties` worker loops and starts the ticker.
    pub fn new<F>(parties: usize, duration: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let state = Arc::new(TimedState {
            expired: AtomicBool::new(false),
            latch: Latch::new(parties as u64),
        });
        let secs = duration.as_secs();
        debug!("timed barrier: parties={} secs={}", parties, secs);

        let guard = ExpireOnExit(state.clone());
        let ticker = thread::Builder::new()
            .name("barrier-ticker".to_string())
            .spawn(move || {
                for _ in 0..secs {
                    if guard.0.expired.load(SC) {
                        break;
                    }
                    on_tick();
                    thread::sleep(TICK);
                }
                debug!("timed barrier: expired after {}s", secs);
                drop(guard);
            })
            .expect("cannot spawn barrier ticker");

        Self {
            state,
            ticker: Mutex::new(Some(ticker)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state.expired.load(SC)
    }

    pub fn remaining(&self) -> u64 {
        self.state.latch.remaining()
    }
}

impl CompletionBarrier for TimedBarrier {
    fn grab_work(&self) -> bool {
        if self.state.expired.load(SC) {
            self.state.latch.count_down();
            return false;
        }
        true
    }

    fn job_done(&self) {}

    fn wait(&self) {
        self.state.latch.wait();
        let ticker = self.ticker.lock().take();
        if let Some(ticker) = ticker {
            if ticker.join().is_err() {
                warn!("barrier ticker panicked");
            }
        }
    }
}
