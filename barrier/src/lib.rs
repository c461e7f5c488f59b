//! Completion barriers for load-generating worker pools.
//!
//! # Overview
//! A completion barrier lets many concurrent workers decide on their own,
//! without sharing a lock, whether to keep producing work, and lets one
//! controller block until the whole pool has finished.
//!
//! Two stopping policies are provided:
//! - [`CountingBarrier`]: allows exactly `n` units of work in total
//! - [`TimedBarrier`]: allows work until a wall-clock duration has elapsed,
//!   ticking a callback once per second meanwhile
//!
//! Worker code only depends on the [`CompletionBarrier`] trait. The
//! [`new_barrier`] factory picks the variant from a [`StopPolicy`].
//!
//! # Worker contract
//! ```no_run
//! use completion_barrier::{new_barrier, CompletionBarrier, StopPolicy};
//!
//! let barrier = new_barrier(StopPolicy::Requests(1000), 8, || {});
//! std::thread::scope(|s| {
//!     for _ in 0..8 {
//!         let barrier = &barrier;
//!         s.spawn(move || {
//!             while barrier.grab_work() {
//!                 // one unit of work
//!                 barrier.job_done();
//!             }
//!         });
//!     }
//!     barrier.wait();
//! });
//! ```
//!
//! A worker must stop looping the first time `grab_work` returns false, and
//! must call `job_done` exactly once per `true` result. Breaking either rule
//! over-signals the join and panics, or leaves `wait` blocked forever.

pub mod counting;
pub mod latch;
pub mod policy;
pub mod timed;

pub use counting::CountingBarrier;
pub use latch::Latch;
pub use policy::{new_barrier, StopPolicy};
pub use timed::TimedBarrier;

/// The three-operation contract shared by every barrier variant.
pub trait CompletionBarrier: Send + Sync {
    /// Asks whether the caller may perform one more unit of work.
    fn grab_work(&self) -> bool;

    /// Registers completion of a unit granted by [`grab_work`](Self::grab_work).
    fn job_done(&self);

    /// Blocks until the stopping condition is reached and all granted work
    /// has been registered. Called once, by the controller.
    fn wait(&self);
}
