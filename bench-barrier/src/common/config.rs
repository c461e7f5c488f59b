use super::cli::{BenchCli, WorkloadKind};
use super::workload::{SleepWorkload, SpinWorkload, Workload};
use completion_barrier::StopPolicy;
use std::time::Duration;

/// Run length used when neither a request count nor a duration is given.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Config: --requests and --duration cannot be combined")]
    ConflictingPolicies,

    #[error("Config: --connections must be at least 1")]
    ZeroConnections,

    #[error("Config: invalid duration {0}")]
    InvalidDuration(f64),
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub policy: StopPolicy,
    pub connections: usize,
    pub workload: WorkloadKind,
    pub latency: Duration,
    pub progress: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &BenchCli) -> Result<Self, ConfigError> {
        if cli.connections == 0 {
            return Err(ConfigError::ZeroConnections);
        }
        let policy = match (cli.requests, cli.duration) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingPolicies),
            (Some(n), None) => StopPolicy::Requests(n),
            (None, Some(secs)) => {
                let d = Duration::try_from_secs_f64(secs)
                    .map_err(|_| ConfigError::InvalidDuration(secs))?;
                StopPolicy::Duration(d)
            }
            (None, None) => StopPolicy::Duration(DEFAULT_DURATION),
        };
        Ok(Self {
            policy,
            connections: cli.connections,
            workload: cli.workload,
            latency: Duration::from_micros(cli.latency_us),
            progress: !cli.no_progress,
        })
    }

    pub fn build_workload(&self) -> Box<dyn Workload> {
        match self.workload {
            WorkloadKind::Sleep => Box::new(SleepWorkload::new(self.latency)),
            WorkloadKind::Spin => Box::new(SpinWorkload::new(self.latency)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> BenchCli {
        BenchCli::parse_from(std::iter::once("bench-barrier").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_to_timed_run() {
        let config = RunConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config.policy, StopPolicy::Duration(DEFAULT_DURATION));
        assert_eq!(config.connections, 125);
        assert_eq!(config.latency, Duration::from_millis(1));
        assert!(config.progress);
    }

    #[test]
    fn test_request_policy() {
        let config =
            RunConfig::from_cli(&parse(&["-n", "500", "-c", "8", "--workload", "spin"])).unwrap();
        assert_eq!(config.policy, StopPolicy::Requests(500));
        assert_eq!(config.connections, 8);
        assert_eq!(config.workload, WorkloadKind::Spin);
    }

    #[test]
    fn test_fractional_duration_is_kept_for_barrier() {
        let config = RunConfig::from_cli(&parse(&["-d", "2.5", "--no-progress"])).unwrap();
        assert_eq!(
            config.policy,
            StopPolicy::Duration(Duration::from_millis(2500))
        );
        assert_eq!(config.policy.expected_callbacks(), 2);
        assert!(!config.progress);
    }

    #[test]
    fn test_invalid_configs() {
        assert_eq!(
            RunConfig::from_cli(&parse(&["-n", "1", "-d", "1"])).unwrap_err(),
            ConfigError::ConflictingPolicies
        );
        assert_eq!(
            RunConfig::from_cli(&parse(&["-c", "0"])).unwrap_err(),
            ConfigError::ZeroConnections
        );
        assert_eq!(
            RunConfig::from_cli(&parse(&["--duration=-3"])).unwrap_err(),
            ConfigError::InvalidDuration(-3.0)
        );
    }
}
