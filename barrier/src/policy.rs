//! Stop policies and the barrier factory.
//!
//! A run stops either after a fixed number of units of work or after a
//! fixed wall-clock duration. [`new_barrier`] turns a [`StopPolicy`] into
//! the matching [`CompletionBarrier`] so that callers never name a concrete
//! variant.

use crate::counting::CountingBarrier;
use crate::timed::TimedBarrier;
use crate::CompletionBarrier;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop after this many completed units.
    Requests(u64),
    /// Stop once this much wall-clock time has elapsed (whole seconds).
    Duration(Duration),
}

impl StopPolicy {
    /// Number of times the barrier callback fires over a full run.
    ///
    /// For [`StopPolicy::Requests`] the callback fires once per completion,
    /// for [`StopPolicy::Duration`] once per elapsed whole second.
    pub fn expected_callbacks(&self) -> u64 {
        match self {
            StopPolicy::Requests(n) => *n,
            StopPolicy::Duration(d) => d.as_secs(),
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, StopPolicy::Duration(_))
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopPolicy::Requests(n) => write!(f, "{} requests", n),
            StopPolicy::Duration(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}

/// Builds the barrier for `policy`.
///
/// # Arguments
/// * `policy` - When the run stops
/// * `parties` - Number of worker loops; only used by the timed variant
/// * `callback` - Done callback (counting) or tick callback (timed)
pub fn new_barrier<F>(
    policy: StopPolicy,
    parties: usize,
    callback: F,
) -> Arc<dyn CompletionBarrier>
where
    F: Fn() + Send + Sync + 'static,
{
    match policy {
        StopPolicy::Requests(n) => Arc::new(CountingBarrier::new(n, callback)),
        StopPolicy::Duration(d) => Arc::new(TimedBarrier::new(parties, d, callback)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_callbacks() {
        assert_eq!(StopPolicy::Requests(42).expected_callbacks(), 42);
        assert_eq!(
            StopPolicy::Duration(Duration::from_millis(2700)).expected_callbacks(),
            2
        );
        assert!(StopPolicy::Duration(Duration::ZERO).is_timed());
        assert!(!StopPolicy::Requests(1).is_timed());
    }

    #[test]
    fn test_display() {
        assert_eq!(StopPolicy::Requests(10).to_string(), "10 requests");
        assert_eq!(
            StopPolicy::Duration(Duration::from_secs(5)).to_string(),
            "5s"
        );
    }

    #[test]
    fn test_factory_counting() {
        let b = new_barrier(StopPolicy::Requests(2), 100, || {});
        assert!(b.grab_work());
        b.job_done();
        assert!(b.grab_work());
        b.job_done();
        assert!(!b.grab_work());
        b.wait();
    }
}
