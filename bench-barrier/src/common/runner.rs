use super::config::RunConfig;
use super::workload::Workload;
use completion_barrier::{new_barrier, CompletionBarrier, StopPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::panic;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RunSummary {
    pub policy: StopPolicy,
    pub connections: usize,
    pub completed: u64,
    /// Units completed by each worker loop, indexed by worker id.
    pub per_worker: Vec<u64>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.completed as f64 / secs
    }
}

fn progress_bar(config: &RunConfig) -> ProgressBar {
    if !config.progress {
        return ProgressBar::hidden();
    }
    let sty = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    )
    .map(|s| s.progress_chars("##-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(config.policy.expected_callbacks());
    pb.set_style(sty);
    pb.set_message(if config.policy.is_timed() { "s" } else { "reqs" });
    pb
}

fn worker_loop(barrier: &dyn CompletionBarrier, workload: &dyn Workload) -> u64 {
    let mut done = 0;
    while barrier.grab_work() {
        let start = Instant::now();
        workload.execute();
        metrics::histogram!("bench-barrier.unit.latency_us")
            .record(start.elapsed().as_micros() as f64);
        metrics::counter!("bench-barrier.units").increment(1);
        done += 1;
        barrier.job_done();
    }
    done
}

/// Runs `config.connections` worker loops against a barrier built from
/// `config.policy` and blocks until the barrier releases.
pub fn run(config: &RunConfig, workload: &dyn Workload) -> RunSummary {
    info!(
        "Running {} with {} connections, {:?} {:?} per unit",
        config.policy, config.connections, config.workload, config.latency
    );
    let pb = progress_bar(config);
    let pb_callback = pb.clone();
    let barrier = new_barrier(config.policy, config.connections, move || pb_callback.inc(1));

    let start = Instant::now();
    let per_worker: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..config.connections)
            .map(|_| {
                let barrier = barrier.as_ref();
                s.spawn(move || worker_loop(barrier, workload))
            })
            .collect();
        barrier.wait();
        debug!("barrier released after {:.1?}", start.elapsed());
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect()
    });
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    let summary = RunSummary {
        policy: config.policy,
        connections: config.connections,
        completed: per_worker.iter().sum(),
        per_worker,
        elapsed,
    };
    info!(
        "Completed {} units in {:.1?}, {:.1} units/s",
        summary.completed,
        summary.elapsed,
        summary.throughput()
    );
    metrics::gauge!("bench-barrier.units_per_sec").set(summary.throughput());
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::cli::WorkloadKind;
    use crate::common::workload::SleepWorkload;

    fn config(policy: StopPolicy, connections: usize) -> RunConfig {
        RunConfig {
            policy,
            connections,
            workload: WorkloadKind::Sleep,
            latency: Duration::ZERO,
            progress: false,
        }
    }

    #[test]
    fn test_request_run_completes_exact_count() {
        let summary = run(
            &config(StopPolicy::Requests(500), 16),
            &SleepWorkload::new(Duration::ZERO),
        );
        assert_eq!(summary.completed, 500);
        assert_eq!(summary.per_worker.len(), 16);
        assert_eq!(summary.per_worker.iter().sum::<u64>(), 500);
    }

    #[test]
    fn test_more_connections_than_requests() {
        let summary = run(
            &config(StopPolicy::Requests(3), 10),
            &SleepWorkload::new(Duration::ZERO),
        );
        assert_eq!(summary.completed, 3);
        assert!(summary.per_worker.iter().filter(|&&n| n > 0).count() <= 3);
    }

    #[test]
    fn test_throughput_of_empty_run() {
        let summary = RunSummary {
            policy: StopPolicy::Requests(0),
            connections: 1,
            completed: 0,
            per_worker: vec![0],
            elapsed: Duration::ZERO,
        };
        assert_eq!(summary.throughput(), 0.0);
    }
}
