use super::error::{Operation, SchedulerError};
use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Running,
    Waiting,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcessState::New => "NEW",
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Terminated => "TERMINATED",
        };
        f.write_str(label)
    }
}

/// Named priority levels. Lower values are served first.
pub struct Priority;

impl Priority {
    pub const HIGH: i32 = 1;
    pub const MEDIUM: i32 = 5;
    pub const LOW: i32 = 10;
}

/// A schedulable unit of work.
///
/// Schedulers only observe a process through this capability set. The work
/// itself may run on another thread; completion is seen by polling
/// [`Process::state`], which must be free of side effects.
pub trait Process: Send + Sync {
    fn name(&self) -> &str;

    /// Only consulted by the priority policy.
    fn priority(&self) -> i32 {
        Priority::MEDIUM
    }

    fn state(&self) -> ProcessState;

    /// Latest output of the work, for display. `None` if the process has none.
    fn output(&self) -> Option<String> {
        None
    }

    /// Begins the work. Valid only while the process is [`ProcessState::New`].
    fn start(&self) -> Result<(), SchedulerError>;

    /// Wakes a parked process. Valid from any state except
    /// [`ProcessState::Terminated`], and harmless while it is running.
    fn interrupt(&self) -> Result<(), SchedulerError>;
}

pub type ProcessRef = Arc<dyn Process>;

pub(crate) fn invalid_transition(
    process: &dyn Process,
    state: ProcessState,
    operation: Operation,
) -> SchedulerError {
    SchedulerError::InvalidTransition {
        process: process.name().to_owned(),
        state,
        operation,
    }
}

/// Whether `a` and `b` point at the same process.
pub(crate) fn same_process(a: &ProcessRef, b: &ProcessRef) -> bool {
    Arc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ScriptedProcess;

    #[test]
    fn test_state_labels() {
        assert_eq!(ProcessState::New.to_string(), "NEW");
        assert_eq!(ProcessState::Waiting.to_string(), "WAITING");
    }

    #[test]
    fn test_same_process_is_identity() {
        let a: ProcessRef = Arc::new(ScriptedProcess::new("A", 1));
        let b: ProcessRef = Arc::new(ScriptedProcess::new("A", 1));
        assert!(same_process(&a, &a.clone()));
        assert!(!same_process(&a, &b));
    }
}
