use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;

pub fn init_logging(max_level: &str) {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(max_level));
}

#[derive(Serialize, Debug)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Mapping from percentile label (e.g., "p90", "p999") to value.
    pub percentiles: BTreeMap<String, f64>,
}

impl HistogramStats {
    /// Compute histogram statistics and selected percentiles from a slice of raw values.
    pub fn compute(samples: &[ordered_float::OrderedFloat<f64>]) -> Self {
        let len = samples.len();
        if len == 0 {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                percentiles: BTreeMap::new(),
            };
        }
        let mut values: Vec<f64> = samples.iter().map(|v| v.into_inner()).collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / len as f64;
        let percentile = |pct: f64| -> f64 {
            let idx = ((pct / 100.0) * (len as f64 - 1.0)).round() as usize;
            values[idx]
        };

        const PCTS: &[(f64, &str)] = &[
            (50.0, "p50"),
            (75.0, "p75"),
            (90.0, "p90"),
            (95.0, "p95"),
            (99.0, "p99"),
            (99.9, "p999"),
        ];
        let percentiles = PCTS
            .iter()
            .map(|(pct, label)| ((*label).to_string(), percentile(*pct)))
            .collect();

        Self {
            count: len,
            min: values[0],
            max: values[len - 1],
            mean,
            percentiles,
        }
    }
}

#[derive(Serialize)]
pub struct MetricDump {
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    /// For counters and gauges, holds the raw numeric value. `None` for histograms.
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramStats>,
}

/// Process-wide metrics sink backed by the metrics-util debugging recorder.
pub struct MetricsRecorder {
    snapshotter: Snapshotter,
}

impl MetricsRecorder {
    /// Installs the global recorder. Fails if one is already installed.
    pub fn install() -> Result<Self, Box<dyn std::error::Error>> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        recorder
            .install()
            .map_err(|_| "a global metrics recorder is already installed")?;
        Ok(Self { snapshotter })
    }

    pub fn snapshot_metrics(&self) -> HashMap<String, MetricDump> {
        self.snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(ckey, unit, description, value)| {
                let name = ckey.key().name().to_owned();
                let (value, histogram) = match value {
                    DebugValue::Counter(v) => (Some(v.to_string()), None),
                    DebugValue::Gauge(v) => (Some(v.into_inner().to_string()), None),
                    DebugValue::Histogram(samples) => {
                        (None, Some(HistogramStats::compute(&samples)))
                    }
                };
                let dump = MetricDump {
                    name: name.clone(),
                    unit: unit.map(|u| u.as_str().to_owned()),
                    description: description.map(|d| format!("{}", d)),
                    value,
                    histogram,
                };
                (name, dump)
            })
            .collect()
    }
}
