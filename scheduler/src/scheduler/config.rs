use super::{
    error::ConfigError, MlfqScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler, Waiter,
};
use std::{str::FromStr, sync::Arc, time::Duration};

pub const DEFAULT_QUANTUM: Duration = Duration::from_millis(200);
const DEFAULT_PROCESSES: usize = 6;

/// Settings shared by every policy. Fixed once a scheduler is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub quantum: Duration,
}

impl SchedulerConfig {
    pub fn new(quantum: Duration) -> Self {
        Self { quantum }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig::new(DEFAULT_QUANTUM)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    RoundRobin,
    Priority,
    Mlfq,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rr" | "round-robin" => Ok(Policy::RoundRobin),
            "p" | "priority" => Ok(Policy::Priority),
            "mlfq" => Ok(Policy::Mlfq),
            _ => Err(ConfigError::InvalidValue {
                flag: "--policy",
                value: s.to_owned(),
            }),
        }
    }
}

pub fn build_scheduler(
    policy: Policy,
    config: &SchedulerConfig,
    waiter: Arc<dyn Waiter>,
) -> Box<dyn Scheduler> {
    match policy {
        Policy::RoundRobin => Box::new(RoundRobinScheduler::with_waiter(config, waiter)),
        Policy::Priority => Box::new(PriorityScheduler::with_waiter(config, waiter)),
        Policy::Mlfq => Box::new(MlfqScheduler::with_waiter(config, waiter)),
    }
}

/// Options of the simulator binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub policy: Policy,
    pub scheduler: SchedulerConfig,
    pub processes: usize,
    pub headless: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            policy: Policy::RoundRobin,
            scheduler: SchedulerConfig::default(),
            processes: DEFAULT_PROCESSES,
            headless: false,
        }
    }
}

impl RunConfig {
    /// Parses `--policy <rr|priority|mlfq> --quantum <ms> --processes <n> --headless`.
    /// The program name must already be skipped.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = RunConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--policy" => config.policy = value(&mut args, "--policy")?.parse()?,
                "--quantum" => {
                    let millis = parse_number(&mut args, "--quantum")?;
                    config.scheduler = SchedulerConfig::new(Duration::from_millis(millis));
                }
                "--processes" => {
                    config.processes = parse_number(&mut args, "--processes")? as usize;
                }
                "--headless" => config.headless = true,
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }
        Ok(config)
    }
}

fn value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn parse_number(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<u64, ConfigError> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue { flag, value: raw })
}
