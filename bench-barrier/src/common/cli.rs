use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    /// Each unit sleeps for the configured latency
    Sleep,
    /// Each unit busy-spins for the configured latency
    Spin,
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(about = "Drives a pool of workers against a completion barrier")]
pub struct BenchCli {
    /// Total number of units to run. Conflicts with --duration.
    #[arg(short = 'n', long)]
    pub requests: Option<u64>,

    /// Run length in seconds; fractions are truncated. Defaults to 10 when
    /// neither --requests nor --duration is given.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Number of concurrent worker loops
    #[arg(short, long, default_value_t = 125)]
    pub connections: usize,

    /// Simulated latency of one unit of work, in microseconds
    #[arg(long, default_value_t = 1000)]
    pub latency_us: u64,

    #[arg(long, value_enum, default_value = "sleep")]
    pub workload: WorkloadKind,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Output filename for the JSON report
    #[arg(long)]
    pub output: Option<String>,
}
