use super::cli::BenchCli;
use super::runner::RunSummary;
use super::utils::MetricDump;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn build_report(
    args: &BenchCli,
    summary: &RunSummary,
    metrics: &HashMap<String, MetricDump>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Value {
    let duration_secs = (end - start).num_milliseconds() as f64 / 1000.0;
    json!({
        "cli": args,
        "command": std::env::args().collect::<Vec<_>>().join(" "),
        "timestamps": {
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
            "duration_seconds": duration_secs
        },
        "summary": {
            "policy": summary.policy.to_string(),
            "connections": summary.connections,
            "completed": summary.completed,
            "per_worker": &summary.per_worker,
            "elapsed_seconds": summary.elapsed.as_secs_f64(),
            "units_per_sec": summary.throughput()
        },
        "metrics": metrics
    })
}

pub fn write_report(filename: &str, report: &Value) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = Path::new(filename).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(filename, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
