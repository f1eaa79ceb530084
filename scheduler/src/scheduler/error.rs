use super::process::ProcessState;
use std::{error::Error, fmt};

/// The transition a caller tried to drive on a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Interrupt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Start => write!(f, "start"),
            Operation::Interrupt => write!(f, "interrupt"),
        }
    }
}

/// Errors surfaced at the enqueue/start/interrupt boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// `start` on a process that is not new, or `interrupt` on a terminated one.
    InvalidTransition {
        process: String,
        state: ProcessState,
        operation: Operation,
    },
    /// The process is already held by this scheduler.
    AlreadyQueued(String),
    /// Only freshly created processes may be enqueued.
    NotNew { process: String, state: ProcessState },
    /// The scheduler is in the middle of a run.
    Draining(String),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::InvalidTransition {
                process,
                state,
                operation,
            } => write!(f, "cannot {operation} \"{process}\" while it is {state}"),
            SchedulerError::AlreadyQueued(process) => {
                write!(f, "\"{process}\" is already queued")
            }
            SchedulerError::NotNew { process, state } => {
                write!(f, "\"{process}\" is {state}, only new processes can be enqueued")
            }
            SchedulerError::Draining(process) => {
                write!(f, "cannot enqueue \"{process}\" while the scheduler is running")
            }
        }
    }
}

impl Error for SchedulerError {}

/// Errors from parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "unknown argument \"{flag}\""),
            ConfigError::MissingValue(flag) => write!(f, "{flag} expects a value"),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value \"{value}\" for {flag}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = SchedulerError::InvalidTransition {
            process: "Module 1".to_owned(),
            state: ProcessState::Terminated,
            operation: Operation::Interrupt,
        };
        assert_eq!(
            err.to_string(),
            "cannot interrupt \"Module 1\" while it is TERMINATED"
        );
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::InvalidValue {
            flag: "--quantum",
            value: "fast".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid value \"fast\" for --quantum");
    }
}
