// Load generator driving a pool of worker loops against a completion barrier.
// - stop after --requests units, or after --duration seconds (default 10s)
// - each unit sleeps or spins for --latency-us to stand in for a request
// - optional JSON report with latency histogram and throughput
use bench_barrier::common::config::RunConfig;
use bench_barrier::common::{cli, report, runner, utils};
use chrono::Utc;
use clap::Parser;
use log::{error, info};
use std::process;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    utils::init_logging("info");
    let args = cli::BenchCli::parse();
    let config = match RunConfig::from_cli(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            process::exit(2);
        }
    };
    let metrics_recorder = match utils::MetricsRecorder::install() {
        Ok(recorder) => recorder,
        Err(err) => {
            error!("Cannot install metrics recorder: {}", err);
            process::exit(1);
        }
    };

    let run_start_ts = Utc::now();
    let workload = config.build_workload();
    let summary = runner::run(&config, workload.as_ref());
    let run_end_ts = Utc::now();

    if let Some(output) = &args.output {
        let metrics_data = metrics_recorder.snapshot_metrics();
        let report = report::build_report(&args, &summary, &metrics_data, run_start_ts, run_end_ts);
        info!("Dumping report to {}", output);
        if let Err(err) = report::write_report(output, &report) {
            error!("Cannot write report {}: {}", output, err);
            process::exit(1);
        }
    }
}
